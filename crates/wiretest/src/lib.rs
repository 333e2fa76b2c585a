#![forbid(unsafe_code)]

//! Test doubles for reactive wire adapters.
//!
//! # Role in wiretest
//! `wiretest` is the public surface. It composes the registry engine from
//! `wiretest-core` with a [`FlavorPolicy`] per adapter flavor and exposes the
//! factories tests use to mock adapters:
//!
//! - [`create_test_wire_adapter`]: values of any shape.
//! - [`create_lds_test_wire_adapter`]: `{ data, error }` envelopes with
//!   NOT_FOUND error defaults.
//! - [`create_apex_test_wire_adapter`]: `{ data, error }` envelopes with
//!   Bad Request error defaults; callable imperatively.
//!
//! The `register_*` functions are the deprecated path: they bind a new mock
//! to an existing adapter identity through [`WireBindings`].
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use serde_json::json;
//! use wiretest::{WireAdapterMock, WireBindings, create_lds_test_wire_adapter};
//!
//! let adapter = create_lds_test_wire_adapter(None);
//! let bindings = WireBindings::new();
//!
//! let seen = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&seen);
//! let wired = bindings
//!     .construct(adapter.id(), Rc::new(move |v| *sink.borrow_mut() = Some(v)))
//!     .unwrap();
//! wired.connect();
//!
//! adapter.emit(json!({ "name": "Acme" }));
//! assert_eq!(*seen.borrow(), Some(json!({ "data": { "name": "Acme" } })));
//! ```

pub mod bindings;
pub mod data_service;
pub mod generic;
pub mod identity;
pub mod mock;
pub mod policy;

pub use bindings::WireBindings;
pub use data_service::{ApexTestWireAdapter, DataServiceWireAdapter, LdsTestWireAdapter};
pub use generic::TestWireAdapter;
pub use identity::AdapterId;
pub use mock::{ImperativeFn, MockEngine, WireAdapterMock, imperative};
pub use policy::{FlavorKind, FlavorPolicy};

pub use wiretest_core::{
    AdapterInstance, AdapterRegistry, ConfigFilter, DataCallback, ErrorDefaults, ErrorOptions,
    ErrorPayload, Lifecycle, SharedConstructor, WireAdapter, WireAdapterConstructor, WireConfig,
    WireError, WireResult, WireValue, config_from, empty_config,
};

use tracing::warn;

/// Where deprecation notices send readers.
pub const MIGRATION_LINK: &str = "https://github.com/salesforce/wire-service-jest-util/blob/master/docs/migrating-from-version-2.x-to-3.x.md";

/// Deprecation notice for a legacy registration function.
#[must_use]
pub fn migration_message(register_fn_name: &str) -> String {
    format!("{register_fn_name} is deprecated. More details: {MIGRATION_LINK}")
}

/// Mock a generic adapter. `f` makes the mock callable.
#[must_use]
pub fn create_test_wire_adapter(f: Option<ImperativeFn>) -> TestWireAdapter {
    let engine = MockEngine::new("testWireAdapter", FlavorPolicy::generic(), f);
    let id = AdapterId::for_mock("testWireAdapter", engine.clone());
    TestWireAdapter::from_id(id, engine)
}

/// Mock a record-service adapter. `f` makes the mock callable.
#[must_use]
pub fn create_lds_test_wire_adapter(f: Option<ImperativeFn>) -> LdsTestWireAdapter {
    create_data_service("ldsTestWireAdapter", FlavorPolicy::lds(), f)
}

/// Mock an RPC-method adapter. `f` is the implementation invoked when the
/// mock is called imperatively.
#[must_use]
pub fn create_apex_test_wire_adapter(f: Option<ImperativeFn>) -> ApexTestWireAdapter {
    create_data_service("apexTestWireAdapter", FlavorPolicy::apex(), f)
}

fn create_data_service(
    name: &str,
    policy: FlavorPolicy,
    f: Option<ImperativeFn>,
) -> DataServiceWireAdapter {
    let engine = MockEngine::new(name, policy, f);
    let id = AdapterId::for_mock(name, engine.clone());
    DataServiceWireAdapter::from_id(id, engine)
}

/// A mock built from a custom policy.
///
/// Data-service policies yield [`WireMock::DataService`], the generic policy
/// yields [`WireMock::Generic`].
#[must_use]
pub fn create_mock_with_policy(
    name: &str,
    policy: FlavorPolicy,
    f: Option<ImperativeFn>,
) -> WireMock {
    let engine = MockEngine::new(name, policy, f);
    let id = AdapterId::for_mock(name, engine.clone());
    if engine.kind().is_data_service() {
        WireMock::DataService(DataServiceWireAdapter::from_id(id, engine))
    } else {
        WireMock::Generic(TestWireAdapter::from_id(id, engine))
    }
}

/// A mock of either contract.
#[derive(Debug, Clone)]
pub enum WireMock {
    Generic(TestWireAdapter),
    DataService(DataServiceWireAdapter),
}

impl WireAdapterMock for WireMock {
    fn id(&self) -> &AdapterId {
        match self {
            Self::Generic(m) => m.id(),
            Self::DataService(m) => m.id(),
        }
    }

    fn engine(&self) -> &MockEngine {
        match self {
            Self::Generic(m) => m.engine(),
            Self::DataService(m) => m.engine(),
        }
    }
}

/// Bind a new record-service mock to `identifier`.
///
/// The host's adapter for `identifier` is replaced only when the host knows
/// it. An identifier that already is a data-service mock is returned as-is.
#[deprecated(note = "mock adapters with `create_lds_test_wire_adapter` instead")]
pub fn register_lds_test_wire_adapter(
    bindings: &WireBindings,
    identifier: Option<&AdapterId>,
) -> Result<LdsTestWireAdapter, WireError> {
    register_data_service(bindings, identifier, "registerLdsTestWireAdapter", FlavorPolicy::lds)
}

/// Bind a new RPC-method mock to `identifier`.
///
/// The host's adapter for `identifier` is replaced only when the host knows
/// it. An identifier that already is a data-service mock is returned as-is.
#[deprecated(note = "mock adapters with `create_apex_test_wire_adapter` instead")]
pub fn register_apex_test_wire_adapter(
    bindings: &WireBindings,
    identifier: Option<&AdapterId>,
) -> Result<ApexTestWireAdapter, WireError> {
    register_data_service(bindings, identifier, "registerApexTestWireAdapter", FlavorPolicy::apex)
}

/// Bind a new generic mock to `identifier`.
///
/// The host's adapter for `identifier` is replaced only when the host knows
/// it. An identifier that already is a mock (of any flavor) is returned as-is.
#[deprecated(note = "mock adapters with `create_test_wire_adapter` instead")]
pub fn register_test_wire_adapter(
    bindings: &WireBindings,
    identifier: Option<&AdapterId>,
) -> Result<TestWireAdapter, WireError> {
    let id = identifier.ok_or(WireError::NoAdapterSpecified)?;
    warn!("{}", migration_message("registerTestWireAdapter"));

    if let Some(engine) = id.engine() {
        return Ok(TestWireAdapter::from_id(id.clone(), engine.clone()));
    }

    let engine = MockEngine::new(id.name(), FlavorPolicy::generic(), None);
    let mock_id = AdapterId::for_mock(id.name(), engine.clone());
    let adapter = TestWireAdapter::from_id(mock_id, engine);
    bindings.deprecated_register_adapter(id, adapter.engine());
    Ok(adapter)
}

fn register_data_service(
    bindings: &WireBindings,
    identifier: Option<&AdapterId>,
    fn_name: &str,
    policy: fn() -> FlavorPolicy,
) -> Result<DataServiceWireAdapter, WireError> {
    let id = identifier.ok_or(WireError::NoAdapterSpecified)?;
    warn!("{}", migration_message(fn_name));

    if let Some(engine) = id.engine() {
        if !engine.kind().is_data_service() {
            return Err(WireError::FlavorMismatch {
                expected: "data-service",
                found: engine.kind().as_str(),
            });
        }
        return Ok(DataServiceWireAdapter::from_id(id.clone(), engine.clone()));
    }

    let adapter = create_data_service(id.name(), policy(), None);
    bindings.deprecated_register_adapter(id, adapter.engine());
    Ok(adapter)
}

/// Common imports for tests using wire adapter mocks.
pub mod prelude {
    pub use crate::{
        AdapterId, ApexTestWireAdapter, ErrorOptions, LdsTestWireAdapter, TestWireAdapter,
        WireAdapterMock, WireBindings, WireConfig, WireError, WireResult, WireValue,
        create_apex_test_wire_adapter, create_lds_test_wire_adapter, create_test_wire_adapter,
        imperative,
    };
}
