#![forbid(unsafe_code)]

//! Binding shim between the host framework and mocked adapters.
//!
//! [`WireBindings`] is the table the host consults when it wires a component
//! usage: given the [`AdapterId`] named in a wire declaration it yields the
//! constructor to call. Tests substitute constructors by spying on an
//! identity; the legacy `register_*` entry points use exactly that.
//!
//! Resolution order for an identity:
//!
//! 1. a spy installed with [`WireBindings::spy_adapter`];
//! 2. the identity's own mock engine, when it is a mock;
//! 3. the real constructor registered with [`WireBindings::register_adapter`].
//!
//! The table is an explicit object; separate tables never observe each
//! other, and [`WireBindings::reset`] restores a clean state between tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use wiretest_core::{DataCallback, SharedConstructor, WireAdapter};

use crate::identity::AdapterId;
use crate::mock::MockEngine;

#[derive(Default)]
struct BindingsInner {
    adapters: HashMap<AdapterId, SharedConstructor>,
    spies: HashMap<AdapterId, SharedConstructor>,
}

/// Host-facing table of adapter constructors. Clones share the table.
#[derive(Clone, Default)]
pub struct WireBindings {
    inner: Rc<RefCell<BindingsInner>>,
}

impl std::fmt::Debug for WireBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("WireBindings")
            .field("adapters", &inner.adapters.len())
            .field("spies", &inner.spies.len())
            .finish()
    }
}

impl WireBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a real adapter known to the host.
    pub fn register_adapter(&self, id: &AdapterId, constructor: SharedConstructor) {
        self.inner
            .borrow_mut()
            .adapters
            .insert(id.clone(), constructor);
    }

    /// Substitute the constructor used for `id`. Replaces an earlier spy.
    pub fn spy_adapter(&self, id: &AdapterId, constructor: SharedConstructor) {
        debug!(adapter = %id, "spy installed");
        self.inner.borrow_mut().spies.insert(id.clone(), constructor);
    }

    /// Route `id` to a mock engine, as the legacy registration path does.
    ///
    /// Only identities the host knows are spied; returns whether the spy was
    /// installed.
    pub fn deprecated_register_adapter(&self, id: &AdapterId, engine: &MockEngine) -> bool {
        if !self.is_registered(id) {
            debug!(adapter = %id, "legacy registration skipped: adapter unknown to host");
            return false;
        }
        self.spy_adapter(id, Rc::new(engine.clone()));
        true
    }

    /// Remove the spy on `id`, if any.
    pub fn remove_spy(&self, id: &AdapterId) -> bool {
        self.inner.borrow_mut().spies.remove(id).is_some()
    }

    #[must_use]
    pub fn is_spied(&self, id: &AdapterId) -> bool {
        self.inner.borrow().spies.contains_key(id)
    }

    #[must_use]
    pub fn is_registered(&self, id: &AdapterId) -> bool {
        self.inner.borrow().adapters.contains_key(id)
    }

    /// Constructor the host must call for `id`.
    #[must_use]
    pub fn resolve(&self, id: &AdapterId) -> Option<SharedConstructor> {
        let inner = self.inner.borrow();
        if let Some(spy) = inner.spies.get(id) {
            return Some(Rc::clone(spy));
        }
        if let Some(engine) = id.engine() {
            return Some(Rc::new(engine.clone()));
        }
        inner.adapters.get(id).cloned()
    }

    /// Resolve `id` and construct an adapter for one component usage.
    #[must_use]
    pub fn construct(
        &self,
        id: &AdapterId,
        callback: DataCallback,
    ) -> Option<Box<dyn WireAdapter>> {
        let constructor = self.resolve(id)?;
        Some(constructor.construct(callback))
    }

    pub fn clear_spies(&self) {
        self.inner.borrow_mut().spies.clear();
    }

    /// Forget every registered adapter and spy.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.adapters.clear();
        inner.spies.clear();
    }
}
