#![forbid(unsafe_code)]

//! Data-service flavors: record-service (LDS) and RPC-method (Apex) mocks.
//!
//! Every emission is a `{ data, error }` envelope with exactly one side
//! defined. Freshly constructed instances receive `{}` (both sides
//! undefined) so a component observes an empty result before it connects.
//!
//! # Invariants
//!
//! 1. `error` and `emit_error` validate the status before any delivery.
//! 2. `error` always targets every live instance; `emit_error` is its
//!    filtered counterpart.

use serde_json::Value;
use wiretest_core::{ErrorOptions, ErrorPayload, WireConfig, WireError};

use crate::identity::AdapterId;
use crate::mock::{MockEngine, WireAdapterMock};
use crate::policy::FlavorKind;

/// Mock of a data-service wire adapter.
///
/// ```
/// use serde_json::json;
/// use wiretest::{WireAdapterMock, create_lds_test_wire_adapter};
///
/// let adapter = create_lds_test_wire_adapter(None);
/// adapter.emit(json!({ "fields": {} }));
/// assert!(adapter.error(None, Some(300), None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DataServiceWireAdapter {
    id: AdapterId,
    engine: MockEngine,
}

/// Record-service mock (NOT_FOUND defaults).
pub type LdsTestWireAdapter = DataServiceWireAdapter;

/// RPC-method mock (Bad Request defaults); usually created callable.
pub type ApexTestWireAdapter = DataServiceWireAdapter;

impl DataServiceWireAdapter {
    pub(crate) fn from_id(id: AdapterId, engine: MockEngine) -> Self {
        debug_assert!(engine.kind().is_data_service());
        Self { id, engine }
    }

    #[must_use]
    pub fn kind(&self) -> FlavorKind {
        self.engine.kind()
    }

    /// Emit an error to every live instance. Omitted fields take the
    /// flavor's defaults.
    pub fn error(
        &self,
        body: Option<Value>,
        status: Option<u16>,
        status_text: Option<&str>,
    ) -> Result<usize, WireError> {
        let options = ErrorOptions {
            body,
            status,
            status_text: status_text.map(str::to_string),
        };
        self.engine.emit_error(options, None)
    }

    /// Emit an error to the live instances whose config passes `filter`, or
    /// to all of them when no filter is given.
    pub fn emit_error(
        &self,
        options: Option<ErrorOptions>,
        filter: Option<&dyn Fn(&WireConfig) -> bool>,
    ) -> Result<usize, WireError> {
        self.engine
            .emit_error(options.unwrap_or_default(), filter)
    }

    /// The payload `error` would deliver for these overrides.
    pub fn build_error(&self, options: ErrorOptions) -> Result<ErrorPayload, WireError> {
        self.engine.build_error(options)
    }
}

impl WireAdapterMock for DataServiceWireAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn engine(&self) -> &MockEngine {
        &self.engine
    }
}
