#![forbid(unsafe_code)]

//! Reactive configuration and wire value types.
//!
//! A wire configuration is the parameter mapping a component recomputes and
//! pushes to its adapter instance whenever one of its reactive inputs changes.
//! Values travelling back to the component are arbitrary JSON.

use serde_json::{Map, Value};

/// A value delivered to a component through its data callback.
pub type WireValue = Value;

/// Reactive parameters for one adapter instance. Key order is irrelevant.
pub type WireConfig = Map<String, Value>;

/// An empty configuration, the state a freshly connected instance reports.
#[must_use]
pub fn empty_config() -> WireConfig {
    WireConfig::new()
}

/// Build a configuration from a JSON object literal.
///
/// Non-object values produce an empty configuration.
///
/// ```
/// use serde_json::json;
/// use wiretest_core::config::config_from;
///
/// let cfg = config_from(json!({ "recordId": "001" }));
/// assert_eq!(cfg.get("recordId"), Some(&json!("001")));
/// assert!(config_from(json!(42)).is_empty());
/// ```
#[must_use]
pub fn config_from(value: Value) -> WireConfig {
    match value {
        Value::Object(map) => map,
        _ => WireConfig::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_is_empty() {
        assert!(empty_config().is_empty());
    }

    #[test]
    fn config_from_object_keeps_entries() {
        let cfg = config_from(json!({ "p": "a", "p2": "second" }));
        assert_eq!(cfg.len(), 2);
        assert_eq!(cfg["p2"], json!("second"));
    }

    #[test]
    fn config_equality_ignores_insertion_order() {
        let a = config_from(json!({ "a": 1, "b": 2 }));
        let mut b = WireConfig::new();
        b.insert("b".into(), json!(2));
        b.insert("a".into(), json!(1));
        assert_eq!(a, b);
    }

    #[test]
    fn config_from_non_object_is_empty() {
        assert!(config_from(json!([1, 2])).is_empty());
        assert!(config_from(Value::Null).is_empty());
    }
}
