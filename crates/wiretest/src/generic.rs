#![forbid(unsafe_code)]

//! Generic flavor: values of any shape, delivered unchanged.

use crate::identity::AdapterId;
use crate::mock::{MockEngine, WireAdapterMock};

/// Mock of a generic wire adapter.
///
/// ```
/// use serde_json::json;
/// use wiretest::{WireAdapterMock, create_test_wire_adapter};
///
/// let adapter = create_test_wire_adapter(None);
/// assert_eq!(adapter.emit(json!({ "any": "shape" })), 0);
/// assert_eq!(adapter.get_last_config(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TestWireAdapter {
    id: AdapterId,
    engine: MockEngine,
}

impl TestWireAdapter {
    pub(crate) fn from_id(id: AdapterId, engine: MockEngine) -> Self {
        Self { id, engine }
    }
}

impl WireAdapterMock for TestWireAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn engine(&self) -> &MockEngine {
        &self.engine
    }
}
