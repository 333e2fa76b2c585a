#![forbid(unsafe_code)]

//! One wiring between a component usage and a mocked adapter.
//!
//! An [`AdapterInstance`] owns the component's data callback and the config
//! most recently pushed to it, and reports every lifecycle transition to the
//! [`AdapterRegistry`] that created it.
//!
//! # State machine
//!
//! ```text
//! Created ──connect──▶ Connected ──update──▶ Updated ─┐
//!                         ▲  ▲                  │     │update
//!                         │  └──────connect─────┘◀────┘
//!                         │                     │
//!                      connect              disconnect
//!                         │                     ▼
//!                         └────────────── Disconnected
//! ```
//!
//! Updates outside a connected state keep the lifecycle unchanged but are
//! still recorded and forwarded to the registry (last write wins).

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::config::{WireConfig, WireValue, empty_config};
use crate::registry::{AdapterRegistry, WeakRegistry};

/// Callback delivering a value into the component's wired property.
pub type DataCallback = Rc<dyn Fn(WireValue)>;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of an adapter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, never connected.
    Created,
    /// Connected, no update since the connect.
    Connected,
    /// Connected and updated at least once since the connect.
    Updated,
    /// Disconnected; may be connected again.
    Disconnected,
}

impl Lifecycle {
    /// True for `Connected` and `Updated`.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Updated)
    }
}

struct InstanceState {
    config: Option<WireConfig>,
    lifecycle: Lifecycle,
}

struct InstanceInner {
    id: u64,
    callback: DataCallback,
    registry: WeakRegistry,
    state: RefCell<InstanceState>,
}

/// Handle to one adapter instance. Clones share the same instance; equality
/// is identity.
#[derive(Clone)]
pub struct AdapterInstance {
    inner: Rc<InstanceInner>,
}

impl PartialEq for AdapterInstance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AdapterInstance {}

impl std::fmt::Debug for AdapterInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("AdapterInstance")
            .field("id", &self.inner.id)
            .field("lifecycle", &state.lifecycle)
            .field("config", &state.config)
            .finish_non_exhaustive()
    }
}

impl AdapterInstance {
    pub(crate) fn new(registry: &AdapterRegistry, callback: DataCallback) -> Self {
        let id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        trace!(instance = id, registry = %registry.label(), "instance created");
        Self {
            inner: Rc::new(InstanceInner {
                id,
                callback,
                registry: registry.downgrade(),
                state: RefCell::new(InstanceState {
                    config: None,
                    lifecycle: Lifecycle::Created,
                }),
            }),
        }
    }

    /// Process-unique instance id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.state.borrow().lifecycle
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lifecycle().is_connected()
    }

    /// Config from the most recent update since the last connect, or an
    /// empty mapping when there is none.
    #[must_use]
    pub fn config(&self) -> WireConfig {
        self.inner
            .state
            .borrow()
            .config
            .clone()
            .unwrap_or_else(empty_config)
    }

    /// False until the first connect or update.
    #[must_use]
    pub fn has_config(&self) -> bool {
        self.inner.state.borrow().config.is_some()
    }

    /// Store new reactive parameters and forward them to the registry.
    pub fn update(&self, config: WireConfig) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.config = Some(config.clone());
            if state.lifecycle == Lifecycle::Connected {
                state.lifecycle = Lifecycle::Updated;
            }
        }
        trace!(instance = self.inner.id, "instance updated");
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.record_update(config);
        }
    }

    /// Mark connected, reset the local config and join the live set.
    pub fn connect(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.config = Some(empty_config());
            state.lifecycle = Lifecycle::Connected;
        }
        trace!(instance = self.inner.id, "instance connected");
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.record_connect();
            registry.register(self);
        }
    }

    /// Mark disconnected and leave the live set. Safe to call repeatedly.
    pub fn disconnect(&self) {
        self.inner.state.borrow_mut().lifecycle = Lifecycle::Disconnected;
        trace!(instance = self.inner.id, "instance disconnected");
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.unregister(self);
        }
    }

    /// Deliver `value` to the component.
    ///
    /// # Panics
    ///
    /// Propagates a panic raised by the data callback.
    pub fn emit(&self, value: WireValue) {
        (self.inner.callback)(value);
    }
}
