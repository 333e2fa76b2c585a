#![forbid(unsafe_code)]

//! Shared engine behind every mock flavor.
//!
//! A [`MockEngine`] couples one [`AdapterRegistry`] with a [`FlavorPolicy`]
//! and an optional imperative implementation. It is the constructor the host
//! binding layer calls for each component usage, and the fan-out point the
//! flavor wrappers call from tests.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use wiretest_core::{
    AdapterInstance, AdapterRegistry, ConfigFilter, DataCallback, ErrorOptions, ErrorPayload,
    WireAdapter, WireAdapterConstructor, WireConfig, WireError, WireValue, build_error_payload,
};

use crate::identity::AdapterId;
use crate::policy::{FlavorKind, FlavorPolicy};

/// Implementation invoked when a mock is called imperatively.
pub type ImperativeFn = Rc<dyn Fn(WireValue) -> Option<WireValue>>;

/// Wrap a closure as an [`ImperativeFn`].
pub fn imperative(f: impl Fn(WireValue) -> Option<WireValue> + 'static) -> ImperativeFn {
    Rc::new(f)
}

/// Registry, policy and imperative implementation of one mock.
#[derive(Clone)]
pub struct MockEngine {
    registry: AdapterRegistry,
    policy: Rc<FlavorPolicy>,
    imperative: Option<ImperativeFn>,
    calls: Rc<RefCell<Vec<WireValue>>>,
}

impl std::fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEngine")
            .field("registry", &self.registry)
            .field("kind", &self.policy.kind)
            .field("callable", &self.imperative.is_some())
            .field("calls", &self.calls.borrow().len())
            .finish()
    }
}

impl MockEngine {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        policy: FlavorPolicy,
        imperative: Option<ImperativeFn>,
    ) -> Self {
        Self {
            registry: AdapterRegistry::new(label),
            policy: Rc::new(policy),
            imperative,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FlavorKind {
        self.policy.kind
    }

    #[must_use]
    pub fn policy(&self) -> &FlavorPolicy {
        &self.policy
    }

    #[must_use]
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Create, register and prime an instance for one component usage.
    #[must_use]
    pub fn create_instance(&self, callback: DataCallback) -> AdapterInstance {
        let instance = self.registry.new_instance(callback);
        if self.policy.register_on_construct {
            self.registry.register(&instance);
        }
        if let Some(initial) = &self.policy.initial_value {
            instance.emit(initial.clone());
        }
        instance
    }

    /// Shape and fan out a value.
    pub fn emit(&self, value: WireValue, filter: Option<ConfigFilter<'_>>) -> usize {
        self.registry.broadcast(&self.policy.shape(value), filter)
    }

    /// Build an error payload with this flavor's defaults.
    pub fn build_error(&self, options: ErrorOptions) -> Result<ErrorPayload, WireError> {
        let defaults = self
            .policy
            .error_defaults
            .as_ref()
            .ok_or(WireError::FlavorMismatch {
                expected: "data-service",
                found: self.policy.kind.as_str(),
            })?;
        build_error_payload(options, defaults)
    }

    /// Validate, build, shape and fan out an error. Nothing is delivered when
    /// validation fails.
    pub fn emit_error(
        &self,
        options: ErrorOptions,
        filter: Option<ConfigFilter<'_>>,
    ) -> Result<usize, WireError> {
        let payload = self.build_error(options)?;
        Ok(self
            .registry
            .broadcast(&self.policy.shape_failure(payload), filter))
    }

    #[must_use]
    pub fn last_config(&self) -> Option<WireConfig> {
        self.registry.last_config()
    }

    pub fn reset_last_config(&self) {
        self.registry.reset_last_config();
    }

    /// Record the call and forward it to the imperative implementation.
    pub fn call(&self, args: WireValue) -> Option<WireValue> {
        self.calls.borrow_mut().push(args.clone());
        trace!(registry = %self.registry.label(), "imperative call");
        self.imperative.as_ref().and_then(|f| f(args))
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.imperative.is_some()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<WireValue> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl WireAdapterConstructor for MockEngine {
    fn construct(&self, callback: DataCallback) -> Box<dyn WireAdapter> {
        Box::new(self.create_instance(callback))
    }
}

/// Operations every mock flavor exposes.
pub trait WireAdapterMock {
    /// Identity components name in their wire declarations.
    fn id(&self) -> &AdapterId;

    fn engine(&self) -> &MockEngine;

    /// Emit a value to every live instance.
    fn emit(&self, value: WireValue) -> usize {
        self.engine().emit(value, None)
    }

    /// Emit a value to the live instances whose config passes `filter`.
    fn emit_filtered(&self, value: WireValue, filter: impl Fn(&WireConfig) -> bool) -> usize
    where
        Self: Sized,
    {
        self.engine().emit(value, Some(&filter))
    }

    /// Last config resolved by any instance; `None` before the first connect.
    fn get_last_config(&self) -> Option<WireConfig> {
        self.engine().last_config()
    }

    fn reset_last_config(&self) {
        self.engine().reset_last_config();
    }

    /// Invoke the mock imperatively.
    fn call(&self, args: WireValue) -> Option<WireValue> {
        self.engine().call(args)
    }

    /// Arguments of every imperative call so far.
    fn calls(&self) -> Vec<WireValue> {
        self.engine().calls()
    }

    fn call_count(&self) -> usize {
        self.engine().calls().len()
    }

    /// Number of live instances.
    fn live_count(&self) -> usize {
        self.engine().registry().live_count()
    }
}
