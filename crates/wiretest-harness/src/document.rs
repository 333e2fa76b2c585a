#![forbid(unsafe_code)]

//! A document body that mounts and unmounts elements.

use std::cell::RefCell;

use tracing::trace;
use wiretest::WireBindings;

use crate::component::{ComponentDef, Element, HarnessError};

/// Host document: creates elements against one binding table and owns the
/// list of mounted ones.
#[derive(Debug, Default)]
pub struct Document {
    bindings: WireBindings,
    body: RefCell<Vec<Element>>,
}

impl Document {
    #[must_use]
    pub fn new(bindings: WireBindings) -> Self {
        Self {
            bindings,
            body: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn bindings(&self) -> &WireBindings {
        &self.bindings
    }

    /// Create (but do not mount) an element.
    pub fn create_element(&self, def: &ComponentDef) -> Result<Element, HarnessError> {
        Element::create(&self.bindings, def)
    }

    /// Mount `element`, connecting its wires. Mounting twice is a no-op.
    pub fn append_child(&self, element: &Element) {
        {
            let mut body = self.body.borrow_mut();
            if body.contains(element) {
                return;
            }
            body.push(element.clone());
        }
        trace!(tag = %element.tag(), "append_child");
        element.connect();
    }

    /// Unmount `element`, disconnecting its wires. Returns whether it was
    /// mounted.
    pub fn remove_child(&self, element: &Element) -> bool {
        let removed = {
            let mut body = self.body.borrow_mut();
            let before = body.len();
            body.retain(|e| e != element);
            before != body.len()
        };
        if removed {
            trace!(tag = %element.tag(), "remove_child");
            element.disconnect();
        }
        removed
    }

    /// Unmount every element, in mount order.
    pub fn clear_body(&self) {
        let mounted = std::mem::take(&mut *self.body.borrow_mut());
        for element in &mounted {
            element.disconnect();
        }
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.body.borrow().len()
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        self.clear_body();
    }
}
