#![forbid(unsafe_code)]

//! Reference adapters and example components.
//!
//! [`ExampleAdapters`] holds one of each kind of identity a test suite meets:
//! real adapters known to the host, adapters mocked with the `create_*`
//! factories, and a pre-existing legacy identity. The component builders
//! wire them the way the example `generic`, `lds` and `apex` components do.

use std::rc::Rc;

use wiretest::{
    AdapterId, ApexTestWireAdapter, DataCallback, LdsTestWireAdapter, SharedConstructor,
    TestWireAdapter, WireAdapter, WireAdapterMock, WireBindings, WireConfig,
    create_apex_test_wire_adapter, create_lds_test_wire_adapter, create_test_wire_adapter,
};

use crate::component::{ComponentDef, WireDeclaration};

/// Stand-in for a real adapter: accepts every lifecycle call, never emits.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAdapter;

impl WireAdapter for NoopAdapter {
    fn update(&self, _config: WireConfig) {}
    fn connect(&self) {}
    fn disconnect(&self) {}
}

/// Constructor producing [`NoopAdapter`]s.
#[must_use]
pub fn noop_constructor() -> SharedConstructor {
    Rc::new(|_callback: DataCallback| -> Box<dyn WireAdapter> { Box::new(NoopAdapter) })
}

/// Adapter identities used by the example components.
#[derive(Debug, Clone)]
pub struct ExampleAdapters {
    /// Real record-service adapter.
    pub lds_adapter: AdapterId,
    /// Identity a legacy suite already registered with the host.
    pub lds_adapter_legacy_mock: AdapterId,
    pub lds_adapter_mock: LdsTestWireAdapter,
    /// Real generic adapter.
    pub test_adapter: AdapterId,
    pub test_adapter_mock: TestWireAdapter,
    /// Mocked RPC method.
    pub apex_method: ApexTestWireAdapter,
    /// Real RPC method.
    pub legacy_apex_method: AdapterId,
}

impl ExampleAdapters {
    /// Create the identities and make the real ones known to `bindings`.
    #[must_use]
    pub fn new(bindings: &WireBindings) -> Self {
        let adapters = Self {
            lds_adapter: AdapterId::new("ldsAdapter"),
            lds_adapter_legacy_mock: AdapterId::new("ldsAdapterLegacyMock"),
            lds_adapter_mock: create_lds_test_wire_adapter(None),
            test_adapter: AdapterId::new("testAdapter"),
            test_adapter_mock: create_test_wire_adapter(None),
            apex_method: create_apex_test_wire_adapter(None),
            legacy_apex_method: AdapterId::new("Apex.LegacyApexMethod"),
        };
        for id in [
            &adapters.lds_adapter,
            &adapters.lds_adapter_legacy_mock,
            &adapters.test_adapter,
            &adapters.legacy_apex_method,
        ] {
            bindings.register_adapter(id, noop_constructor());
        }
        adapters
    }
}

/// `example-generic`: `wiredValue` on the real generic adapter and
/// `mockedValue` on its mock, both configured with `{ p: $param }`.
#[must_use]
pub fn generic_component(adapters: &ExampleAdapters) -> ComponentDef {
    ComponentDef::new("example-generic")
        .wire(WireDeclaration::new("wiredValue", &adapters.test_adapter).reactive("p", "param"))
        .wire(
            WireDeclaration::new("mockedValue", adapters.test_adapter_mock.id())
                .reactive("p", "param"),
        )
}

/// `example-lds`: one field per record-service identity, each
/// `<name>Value` with `{ p: $param }`.
#[must_use]
pub fn lds_component(adapters: &ExampleAdapters) -> ComponentDef {
    ComponentDef::new("example-lds")
        .wire(WireDeclaration::new("ldsAdapterValue", &adapters.lds_adapter).reactive("p", "param"))
        .wire(
            WireDeclaration::new("ldsAdapterLegacyMockValue", &adapters.lds_adapter_legacy_mock)
                .reactive("p", "param"),
        )
        .wire(
            WireDeclaration::new("ldsAdapterMockValue", adapters.lds_adapter_mock.id())
                .reactive("p", "param"),
        )
}

/// `example-apex`: the mocked method wired twice (the second usage adds
/// `p2: 'second'`) plus the real legacy method.
#[must_use]
pub fn apex_component(adapters: &ExampleAdapters) -> ComponentDef {
    ComponentDef::new("example-apex")
        .wire(
            WireDeclaration::new("ApexMethodValue", adapters.apex_method.id())
                .reactive("p", "param"),
        )
        .wire(
            WireDeclaration::new("ApexMethodSecondUsageValue", adapters.apex_method.id())
                .reactive("p", "param")
                .literal("p2", serde_json::json!("second")),
        )
        .wire(
            WireDeclaration::new("LegacyApexMethodValue", &adapters.legacy_apex_method)
                .reactive("p", "param"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn real_adapters_are_registered() {
        let bindings = WireBindings::new();
        let adapters = ExampleAdapters::new(&bindings);
        assert!(bindings.is_registered(&adapters.lds_adapter));
        assert!(bindings.is_registered(&adapters.legacy_apex_method));
        assert!(!bindings.is_registered(adapters.lds_adapter_mock.id()));
    }

    #[test]
    fn every_example_component_can_be_created() {
        let document = Document::default();
        let adapters = ExampleAdapters::new(document.bindings());
        for def in [
            generic_component(&adapters),
            lds_component(&adapters),
            apex_component(&adapters),
        ] {
            assert!(document.create_element(&def).is_ok(), "{}", def.tag());
        }
    }

    #[test]
    fn real_adapters_never_deliver() {
        let document = Document::default();
        let adapters = ExampleAdapters::new(document.bindings());
        let element = document.create_element(&lds_component(&adapters)).unwrap();
        document.append_child(&element);
        assert_eq!(element.wired_value("ldsAdapterValue"), None);
        assert!(element.wired_result("ldsAdapterMockValue").is_some());
    }
}
