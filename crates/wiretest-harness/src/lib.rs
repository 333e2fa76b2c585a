#![forbid(unsafe_code)]

//! Simulated host framework for exercising wire adapter mocks end to end.
//!
//! # Role in wiretest
//! Component code never calls adapters directly; a host framework does. This
//! crate plays that host: a [`Document`] creates [`Element`]s from
//! [`ComponentDef`]s, resolves each wired field's adapter through
//! [`wiretest::WireBindings`], and turns mounting, prop changes and
//! unmounting into adapter lifecycle calls.
//!
//! ```
//! use serde_json::json;
//! use wiretest::WireAdapterMock;
//! use wiretest_harness::Document;
//! use wiretest_harness::fixtures::{ExampleAdapters, lds_component};
//!
//! let document = Document::default();
//! let adapters = ExampleAdapters::new(document.bindings());
//! let element = document.create_element(&lds_component(&adapters)).unwrap();
//! element.set_prop("param", json!("v1"));
//! document.append_child(&element);
//!
//! adapters.lds_adapter_mock.emit(json!({ "foo": "bar" }));
//! let result = element.wired_result("ldsAdapterMockValue").unwrap();
//! assert_eq!(result.data, Some(json!({ "foo": "bar" })));
//! ```

pub mod component;
pub mod document;
pub mod fixtures;

pub use component::{ComponentDef, ConfigSource, Element, HarnessError, WireDeclaration};
pub use document::Document;
