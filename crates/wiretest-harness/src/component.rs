#![forbid(unsafe_code)]

//! Components with wired fields, as a host framework would instantiate them.
//!
//! A [`ComponentDef`] lists [`WireDeclaration`]s: a field name, the adapter
//! identity it is wired to, and a config template whose entries are either
//! literals or references to reactive props (`'$param'` in a template
//! language). Creating an [`Element`] constructs one adapter per declaration
//! through [`WireBindings`]; mounting and unmounting it drives the
//! connect/update/disconnect lifecycle.
//!
//! # Lifecycle mapping
//!
//! | Host event | Adapter calls |
//! |------------|---------------|
//! | element created | `construct` |
//! | inserted into a document | `connect`, then `update(resolved config)` |
//! | reactive prop changed while connected | `update` if the resolved config changed |
//! | removed from a document | `disconnect` |

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use wiretest::{AdapterId, WireAdapter, WireBindings, WireConfig, WireResult, WireValue};

/// Where a config entry takes its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Current value of a reactive prop; the key is omitted while unset.
    Reactive(String),
    Literal(WireValue),
}

/// One `@wire(adapter, config) field` declaration.
#[derive(Debug, Clone)]
pub struct WireDeclaration {
    field: String,
    adapter: AdapterId,
    params: Vec<(String, ConfigSource)>,
}

impl WireDeclaration {
    #[must_use]
    pub fn new(field: impl Into<String>, adapter: &AdapterId) -> Self {
        Self {
            field: field.into(),
            adapter: adapter.clone(),
            params: Vec::new(),
        }
    }

    /// Bind config key `key` to the reactive prop `prop`.
    #[must_use]
    pub fn reactive(mut self, key: impl Into<String>, prop: impl Into<String>) -> Self {
        self.params
            .push((key.into(), ConfigSource::Reactive(prop.into())));
        self
    }

    /// Fix config key `key` to `value`.
    #[must_use]
    pub fn literal(mut self, key: impl Into<String>, value: WireValue) -> Self {
        self.params.push((key.into(), ConfigSource::Literal(value)));
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn adapter(&self) -> &AdapterId {
        &self.adapter
    }

    /// Config for the given props.
    #[must_use]
    pub fn resolve(&self, props: &WireConfig) -> WireConfig {
        let mut config = WireConfig::new();
        for (key, source) in &self.params {
            match source {
                ConfigSource::Reactive(prop) => {
                    if let Some(value) = props.get(prop) {
                        config.insert(key.clone(), value.clone());
                    }
                }
                ConfigSource::Literal(value) => {
                    config.insert(key.clone(), value.clone());
                }
            }
        }
        config
    }
}

/// A component definition: a tag and its wired fields.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    tag: String,
    wires: Vec<WireDeclaration>,
}

impl ComponentDef {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            wires: Vec::new(),
        }
    }

    #[must_use]
    pub fn wire(mut self, declaration: WireDeclaration) -> Self {
        self.wires.push(declaration);
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn wires(&self) -> &[WireDeclaration] {
        &self.wires
    }
}

/// Errors raised by the simulated host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// No constructor is known for the adapter a field is wired to.
    UnresolvedAdapter { field: String, adapter: String },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedAdapter { field, adapter } => {
                write!(f, "field '{field}' is wired to unknown adapter '{adapter}'")
            }
        }
    }
}

impl std::error::Error for HarnessError {}

struct WiredField {
    declaration: WireDeclaration,
    adapter: Box<dyn WireAdapter>,
    config: Option<WireConfig>,
}

struct ElementInner {
    tag: String,
    props: WireConfig,
    wires: Vec<WiredField>,
    connected: bool,
}

/// A created component. Clones refer to the same element.
#[derive(Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementInner>>,
    values: Rc<RefCell<HashMap<String, WireValue>>>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Element")
            .field("tag", &inner.tag)
            .field("props", &inner.props)
            .field("wires", &inner.wires.len())
            .field("connected", &inner.connected)
            .finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Element {
    /// Instantiate `def`, constructing one adapter per wired field.
    ///
    /// Adapters may deliver a value during construction; it is visible
    /// through [`Element::wired_value`] before the element is mounted.
    pub fn create(bindings: &WireBindings, def: &ComponentDef) -> Result<Self, HarnessError> {
        let values: Rc<RefCell<HashMap<String, WireValue>>> = Rc::default();
        let mut wires = Vec::with_capacity(def.wires.len());

        for declaration in &def.wires {
            let sink = Rc::clone(&values);
            let field = declaration.field.clone();
            let adapter = bindings
                .construct(
                    &declaration.adapter,
                    Rc::new(move |value| {
                        sink.borrow_mut().insert(field.clone(), value);
                    }),
                )
                .ok_or_else(|| HarnessError::UnresolvedAdapter {
                    field: declaration.field.clone(),
                    adapter: declaration.adapter.name().to_string(),
                })?;
            wires.push(WiredField {
                declaration: declaration.clone(),
                adapter,
                config: None,
            });
        }

        Ok(Self {
            inner: Rc::new(RefCell::new(ElementInner {
                tag: def.tag.clone(),
                props: WireConfig::new(),
                wires,
                connected: false,
            })),
            values,
        })
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.borrow().connected
    }

    #[must_use]
    pub fn prop(&self, name: &str) -> Option<WireValue> {
        self.inner.borrow().props.get(name).cloned()
    }

    /// Set a reactive prop. Connected wires whose config changes receive an
    /// update.
    pub fn set_prop(&self, name: impl Into<String>, value: WireValue) {
        let mut inner = self.inner.borrow_mut();
        inner.props.insert(name.into(), value);
        if inner.connected {
            refresh_configs(&mut inner);
        }
    }

    /// Unset a reactive prop.
    pub fn clear_prop(&self, name: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.props.remove(name).is_some() && inner.connected {
            refresh_configs(&mut inner);
        }
    }

    /// Last value delivered to `field`, if any.
    #[must_use]
    pub fn wired_value(&self, field: &str) -> Option<WireValue> {
        self.values.borrow().get(field).cloned()
    }

    /// Last value delivered to `field`, viewed as a data-service result.
    #[must_use]
    pub fn wired_result(&self, field: &str) -> Option<WireResult> {
        self.values
            .borrow()
            .get(field)
            .and_then(WireResult::from_value)
    }

    /// Config most recently pushed to `field`'s adapter.
    #[must_use]
    pub fn wired_config(&self, field: &str) -> Option<WireConfig> {
        self.inner
            .borrow()
            .wires
            .iter()
            .find(|w| w.declaration.field == field)
            .and_then(|w| w.config.clone())
    }

    pub(crate) fn connect(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.connected {
            return;
        }
        inner.connected = true;
        debug!(tag = %inner.tag, wires = inner.wires.len(), "element connected");

        let ElementInner { props, wires, .. } = &mut *inner;
        for wire in wires.iter_mut() {
            wire.adapter.connect();
            let config = wire.declaration.resolve(props);
            wire.adapter.update(config.clone());
            wire.config = Some(config);
        }
    }

    pub(crate) fn disconnect(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.connected {
            return;
        }
        inner.connected = false;
        debug!(tag = %inner.tag, "element disconnected");
        for wire in &inner.wires {
            wire.adapter.disconnect();
        }
    }
}

fn refresh_configs(inner: &mut ElementInner) {
    let ElementInner { props, wires, .. } = inner;
    for wire in wires.iter_mut() {
        let config = wire.declaration.resolve(props);
        if wire.config.as_ref() != Some(&config) {
            wire.adapter.update(config.clone());
            wire.config = Some(config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiretest::{WireAdapterMock, create_test_wire_adapter};

    #[test]
    fn resolve_skips_unset_reactive_params() {
        let id = AdapterId::new("a");
        let decl = WireDeclaration::new("f", &id)
            .reactive("p", "param")
            .literal("p2", json!("second"));

        let empty = decl.resolve(&WireConfig::new());
        assert_eq!(json!(empty), json!({ "p2": "second" }));

        let mut props = WireConfig::new();
        props.insert("param".into(), json!("v1"));
        assert_eq!(json!(decl.resolve(&props)), json!({ "p": "v1", "p2": "second" }));
    }

    #[test]
    fn unknown_adapter_fails_creation() {
        let def =
            ComponentDef::new("x-test").wire(WireDeclaration::new("f", &AdapterId::new("nope")));
        let err = Element::create(&WireBindings::new(), &def).unwrap_err();
        assert_eq!(err.to_string(), "field 'f' is wired to unknown adapter 'nope'");
    }

    #[test]
    fn prop_changes_update_only_when_connected() {
        let mock = create_test_wire_adapter(None);
        let def = ComponentDef::new("x-test")
            .wire(WireDeclaration::new("f", mock.id()).reactive("p", "param"));
        let element = Element::create(&WireBindings::new(), &def).unwrap();

        element.set_prop("param", json!("early"));
        assert_eq!(mock.get_last_config(), None);

        element.connect();
        assert_eq!(json!(mock.get_last_config()), json!({ "p": "early" }));

        element.set_prop("param", json!("late"));
        assert_eq!(json!(element.wired_config("f")), json!({ "p": "late" }));

        element.clear_prop("param");
        assert_eq!(json!(mock.get_last_config()), json!({}));
    }

    #[test]
    fn unchanged_config_is_not_pushed_again() {
        let mock = create_test_wire_adapter(None);
        let def = ComponentDef::new("x-test")
            .wire(WireDeclaration::new("f", mock.id()).literal("k", json!(1)));
        let element = Element::create(&WireBindings::new(), &def).unwrap();
        element.connect();
        mock.reset_last_config();

        element.set_prop("unrelated", json!(true));
        assert_eq!(mock.get_last_config(), None);
    }

    #[test]
    fn connect_and_disconnect_are_idempotent() {
        let mock = create_test_wire_adapter(None);
        let def = ComponentDef::new("x-test").wire(WireDeclaration::new("f", mock.id()));
        let element = Element::create(&WireBindings::new(), &def).unwrap();
        element.connect();
        element.connect();
        assert_eq!(mock.live_count(), 1);
        element.disconnect();
        element.disconnect();
        assert_eq!(mock.live_count(), 0);
        assert!(!element.is_connected());
    }
}
