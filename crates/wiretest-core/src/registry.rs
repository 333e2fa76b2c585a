#![forbid(unsafe_code)]

//! Per-identity registry of live adapter instances.
//!
//! # Design
//!
//! [`AdapterRegistry`] holds the set of live [`AdapterInstance`]s for one
//! mocked adapter identity, plus the last configuration observed across all
//! of them. Storage is `Rc<RefCell<..>>`; instances keep only a weak link
//! back, so dropping the registry handle never leaks through the live set.
//!
//! # Invariants
//!
//! 1. The live set contains each instance at most once (identity, not value).
//! 2. `last_config` is `None` until the first connect, `{}` after a connect,
//!    and the exact config of the most recent update otherwise.
//! 3. `broadcast` snapshots the live set and applies the filter before the
//!    first delivery; membership changes made by callbacks affect only later
//!    broadcasts.
//! 4. No borrow is held while a data callback runs.
//!
//! # Failure Modes
//!
//! - **Panicking callback**: unwinds out of `broadcast`; instances after it
//!   in the snapshot receive nothing for that pass. Registry state stays
//!   consistent because no borrow is active.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::config::{WireConfig, WireValue, empty_config};
use crate::instance::{AdapterInstance, DataCallback};

/// Predicate over an instance's current configuration.
pub type ConfigFilter<'a> = &'a dyn Fn(&WireConfig) -> bool;

pub(crate) struct RegistryInner {
    label: String,
    live: Vec<AdapterInstance>,
    last_config: Option<WireConfig>,
}

/// Shared registry handle. Cloning yields another handle to the same state.
pub struct AdapterRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Clone for AdapterRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AdapterRegistry")
            .field("label", &inner.label)
            .field("live", &inner.live.len())
            .field("last_config", &inner.last_config)
            .finish()
    }
}

impl AdapterRegistry {
    /// Create an empty registry. `label` names the adapter identity in logs.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                label: label.into(),
                live: Vec::new(),
                last_config: None,
            })),
        }
    }

    /// Label of the adapter identity this registry tracks.
    #[must_use]
    pub fn label(&self) -> String {
        self.inner.borrow().label.clone()
    }

    /// Create an instance owned by this registry. The instance is not
    /// registered; see [`register`](Self::register).
    #[must_use]
    pub fn new_instance(&self, callback: DataCallback) -> AdapterInstance {
        AdapterInstance::new(self, callback)
    }

    /// Add `instance` to the live set unless it is already present.
    pub fn register(&self, instance: &AdapterInstance) {
        let mut inner = self.inner.borrow_mut();
        if !inner.live.iter().any(|live| live == instance) {
            inner.live.push(instance.clone());
        }
    }

    /// Remove `instance` from the live set. Absent instances are ignored.
    pub fn unregister(&self, instance: &AdapterInstance) {
        self.inner.borrow_mut().live.retain(|live| live != instance);
    }

    /// A connect happened: the last config becomes an empty mapping.
    pub fn record_connect(&self) {
        self.inner.borrow_mut().last_config = Some(empty_config());
    }

    /// An update happened: the last config is replaced wholesale.
    pub fn record_update(&self, config: WireConfig) {
        self.inner.borrow_mut().last_config = Some(config);
    }

    /// Last observed config, `None` if no instance ever connected or updated.
    #[must_use]
    pub fn last_config(&self) -> Option<WireConfig> {
        self.inner.borrow().last_config.clone()
    }

    /// Return the last config to its unset state.
    pub fn reset_last_config(&self) {
        self.inner.borrow_mut().last_config = None;
    }

    /// Number of live instances.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Whether `instance` is currently live.
    #[must_use]
    pub fn is_live(&self, instance: &AdapterInstance) -> bool {
        self.inner.borrow().live.iter().any(|live| live == instance)
    }

    /// Snapshot of the live set in registration order.
    #[must_use]
    pub fn live_instances(&self) -> Vec<AdapterInstance> {
        self.inner.borrow().live.clone()
    }

    /// Deliver `value` to every live instance whose config passes `filter`.
    ///
    /// Returns the number of instances the value was delivered to.
    ///
    /// # Panics
    ///
    /// Propagates any panic raised by a data callback; the remaining
    /// instances of this pass receive nothing.
    pub fn broadcast(&self, value: &WireValue, filter: Option<ConfigFilter<'_>>) -> usize {
        let snapshot = self.live_instances();
        let candidates = snapshot.len();
        let targets: Vec<AdapterInstance> = match filter {
            Some(accept) => snapshot
                .into_iter()
                .filter(|instance| accept(&instance.config()))
                .collect(),
            None => snapshot,
        };

        debug!(
            registry = %self.label(),
            candidates,
            targets = targets.len(),
            "broadcast"
        );

        for instance in &targets {
            instance.emit(value.clone());
        }
        targets.len()
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry(Rc::downgrade(&self.inner))
    }
}

/// Non-owning link from an instance back to its registry.
#[derive(Clone)]
pub(crate) struct WeakRegistry(Weak<RefCell<RegistryInner>>);

impl WeakRegistry {
    pub(crate) fn upgrade(&self) -> Option<AdapterRegistry> {
        self.0.upgrade().map(|inner| AdapterRegistry { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn recording(registry: &AdapterRegistry) -> (AdapterInstance, Rc<RefCell<Vec<WireValue>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let instance = registry.new_instance(Rc::new(move |v| sink.borrow_mut().push(v)));
        (instance, log)
    }

    fn cfg(value: serde_json::Value) -> WireConfig {
        crate::config::config_from(value)
    }

    #[test]
    fn register_is_idempotent() {
        let registry = AdapterRegistry::new("test");
        let (a, _) = recording(&registry);
        registry.register(&a);
        registry.register(&a);
        registry.register(&a.clone());
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn register_dedups_by_identity_not_value() {
        let registry = AdapterRegistry::new("test");
        let callback: DataCallback = Rc::new(|_| {});
        let a = registry.new_instance(Rc::clone(&callback));
        let b = registry.new_instance(callback);
        registry.register(&a);
        registry.register(&b);
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn unregister_absent_is_noop() {
        let registry = AdapterRegistry::new("test");
        let (a, _) = recording(&registry);
        let (b, _) = recording(&registry);
        registry.register(&a);
        registry.unregister(&b);
        assert!(registry.is_live(&a));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn last_config_lifecycle() {
        let registry = AdapterRegistry::new("test");
        assert_eq!(registry.last_config(), None);

        registry.record_connect();
        assert_eq!(registry.last_config(), Some(WireConfig::new()));

        registry.record_update(cfg(json!({ "p": "v1" })));
        assert_eq!(registry.last_config(), Some(cfg(json!({ "p": "v1" }))));

        registry.record_update(cfg(json!({ "q": 1 })));
        assert_eq!(registry.last_config(), Some(cfg(json!({ "q": 1 }))));

        registry.reset_last_config();
        assert_eq!(registry.last_config(), None);
    }

    #[test]
    fn broadcast_reaches_every_live_instance() {
        let registry = AdapterRegistry::new("test");
        let (a, log_a) = recording(&registry);
        let (b, log_b) = recording(&registry);
        registry.register(&a);
        registry.register(&b);

        let delivered = registry.broadcast(&json!({ "foo": "bar" }), None);
        assert_eq!(delivered, 2);
        assert_eq!(*log_a.borrow(), vec![json!({ "foo": "bar" })]);
        assert_eq!(*log_b.borrow(), vec![json!({ "foo": "bar" })]);
    }

    #[test]
    fn broadcast_skips_unregistered() {
        let registry = AdapterRegistry::new("test");
        let (a, log_a) = recording(&registry);
        let (b, log_b) = recording(&registry);
        registry.register(&a);
        registry.register(&b);
        registry.unregister(&a);

        assert_eq!(registry.broadcast(&json!(1), None), 1);
        assert!(log_a.borrow().is_empty());
        assert_eq!(log_b.borrow().len(), 1);
    }

    #[test]
    fn broadcast_applies_filter_to_instance_config() {
        let registry = AdapterRegistry::new("test");
        let (a, log_a) = recording(&registry);
        let (b, log_b) = recording(&registry);
        a.connect();
        a.update(cfg(json!({ "p": "a" })));
        b.connect();
        b.update(cfg(json!({ "p": "a", "p2": "second" })));

        let only_second = |c: &WireConfig| c.get("p2") == Some(&json!("second"));
        assert_eq!(registry.broadcast(&json!("x"), Some(&only_second)), 1);
        assert!(log_a.borrow().is_empty());
        assert_eq!(*log_b.borrow(), vec![json!("x")]);
    }

    #[test]
    fn broadcast_with_no_live_instances_delivers_nothing() {
        let registry = AdapterRegistry::new("test");
        assert_eq!(registry.broadcast(&json!(null), None), 0);
    }

    #[test]
    fn instance_registered_during_broadcast_misses_current_pass() {
        let registry = AdapterRegistry::new("test");
        let (late, late_log) = recording(&registry);

        let reg = registry.clone();
        let late_clone = late.clone();
        let trigger = registry.new_instance(Rc::new(move |_| reg.register(&late_clone)));
        registry.register(&trigger);

        assert_eq!(registry.broadcast(&json!(1), None), 1);
        assert!(late_log.borrow().is_empty());
        assert!(registry.is_live(&late));

        assert_eq!(registry.broadcast(&json!(2), None), 2);
        assert_eq!(*late_log.borrow(), vec![json!(2)]);
    }

    #[test]
    fn instance_unregistered_during_broadcast_still_receives_current_pass() {
        let registry = AdapterRegistry::new("test");
        let (victim, victim_log) = recording(&registry);

        let reg = registry.clone();
        let victim_clone = victim.clone();
        let trigger = registry.new_instance(Rc::new(move |_| reg.unregister(&victim_clone)));
        registry.register(&trigger);
        registry.register(&victim);

        assert_eq!(registry.broadcast(&json!("once"), None), 2);
        assert_eq!(*victim_log.borrow(), vec![json!("once")]);

        registry.broadcast(&json!("twice"), None);
        assert_eq!(victim_log.borrow().len(), 1);
    }

    #[test]
    fn reentrant_broadcast_from_callback() {
        let registry = AdapterRegistry::new("test");
        let depth = Rc::new(Cell::new(0u32));
        let reg = registry.clone();
        let depth_clone = Rc::clone(&depth);
        let instance = registry.new_instance(Rc::new(move |_| {
            depth_clone.set(depth_clone.get() + 1);
            if depth_clone.get() == 1 {
                reg.broadcast(&json!("nested"), None);
            }
        }));
        registry.register(&instance);

        registry.broadcast(&json!("outer"), None);
        assert_eq!(depth.get(), 2);
    }

    #[test]
    fn panicking_callback_aborts_remaining_deliveries() {
        let registry = AdapterRegistry::new("test");
        let boom = registry.new_instance(Rc::new(|_| panic!("callback failed")));
        let (after, after_log) = recording(&registry);
        registry.register(&boom);
        registry.register(&after);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.broadcast(&json!(1), None)
        }));
        assert!(result.is_err());
        assert!(after_log.borrow().is_empty());
        // Registry remains usable.
        assert_eq!(registry.live_count(), 2);
        registry.unregister(&boom);
        assert_eq!(registry.broadcast(&json!(2), None), 1);
    }

    #[tracing_test::traced_test]
    #[test]
    fn broadcast_logs_candidate_and_target_counts() {
        let registry = AdapterRegistry::new("getRecord");
        let (a, _) = recording(&registry);
        registry.register(&a);
        registry.broadcast(&json!(1), Some(&|_: &WireConfig| false));
        assert!(logs_contain("broadcast"));
        assert!(logs_contain("candidates=1"));
        assert!(logs_contain("targets=0"));
    }

    #[test]
    fn debug_format() {
        let registry = AdapterRegistry::new("getRecord");
        let dbg = format!("{registry:?}");
        assert!(dbg.contains("AdapterRegistry"));
        assert!(dbg.contains("getRecord"));
    }
}
