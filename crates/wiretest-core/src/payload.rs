#![forbid(unsafe_code)]

//! Standardized failure payloads and the data-service result envelope.
//!
//! Data-service adapters deliver `{ data, error }` envelopes where exactly one
//! side is defined. Failures use the fetch-response shape
//! `{ body, ok: false, status, statusText }`.
//!
//! # Invariants
//!
//! 1. A provided status is validated before any default is applied.
//!    Falsy overrides (a `null`, `false`, `0` or `""` body, status `0`, an
//!    empty status text) count as omitted.
//! 2. Validation never clamps: an out-of-range status is an error.
//! 3. `ok` is always `false`.
//! 4. An undefined envelope side is an absent key on the wire, so an explicit
//!    `null` datum stays distinguishable from "no data".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::WireValue;
use crate::error::WireError;

/// Smallest accepted error status.
pub const MIN_ERROR_STATUS: u16 = 400;
/// Largest accepted error status.
pub const MAX_ERROR_STATUS: u16 = 599;

/// A failure payload in fetch-response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub body: Value,
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
}

impl ErrorPayload {
    /// JSON form with the exact wire field names.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Caller-supplied overrides for an error payload. Omitted fields take the
/// flavor's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorOptions {
    pub body: Option<Value>,
    pub status: Option<u16>,
    pub status_text: Option<String>,
}

impl ErrorOptions {
    /// No overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            body: None,
            status: None,
            status_text: None,
        }
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }
}

/// Default error profile of a data-service flavor.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDefaults {
    pub body: Value,
    pub status: u16,
    pub status_text: String,
}

impl ErrorDefaults {
    /// Record-service profile: resource not found.
    #[must_use]
    pub fn lds() -> Self {
        Self {
            body: json!([{
                "errorCode": "NOT_FOUND",
                "message": "The requested resource does not exist",
            }]),
            status: 404,
            status_text: "NOT_FOUND".to_string(),
        }
    }

    /// RPC-method profile: bad request.
    #[must_use]
    pub fn apex() -> Self {
        Self {
            body: json!({ "message": "An internal server error has occurred" }),
            status: 400,
            status_text: "Bad Request".to_string(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }
}

/// Check that a status lies in the accepted error range.
pub fn validate_status(status: u16) -> Result<u16, WireError> {
    if (MIN_ERROR_STATUS..=MAX_ERROR_STATUS).contains(&status) {
        Ok(status)
    } else {
        Err(WireError::InvalidStatus(status))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build an error payload from overrides and a default profile.
///
/// Falsy overrides fall back to the defaults, like omitted ones.
///
/// ```
/// use wiretest_core::payload::{ErrorDefaults, ErrorOptions, build_error_payload};
///
/// let payload = build_error_payload(ErrorOptions::new(), &ErrorDefaults::lds()).unwrap();
/// assert_eq!(payload.status, 404);
/// assert!(!payload.ok);
///
/// let err = build_error_payload(ErrorOptions::new().status(300), &ErrorDefaults::lds());
/// assert!(err.is_err());
/// ```
pub fn build_error_payload(
    options: ErrorOptions,
    defaults: &ErrorDefaults,
) -> Result<ErrorPayload, WireError> {
    let status = match options.status.filter(|&status| status != 0) {
        Some(status) => validate_status(status)?,
        None => defaults.status,
    };
    Ok(ErrorPayload {
        body: options
            .body
            .filter(is_truthy)
            .unwrap_or_else(|| defaults.body.clone()),
        ok: false,
        status,
        status_text: options
            .status_text
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| defaults.status_text.clone()),
    })
}

/// Typed view of a data-service envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireResult {
    pub data: Option<Value>,
    pub error: Option<ErrorPayload>,
}

impl WireResult {
    /// The envelope delivered when an instance is first created.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    #[must_use]
    pub fn data(value: Value) -> Self {
        Self {
            data: Some(value),
            error: None,
        }
    }

    #[must_use]
    pub fn error(payload: ErrorPayload) -> Self {
        Self {
            data: None,
            error: Some(payload),
        }
    }

    /// Parse an envelope off the wire.
    ///
    /// Returns `None` when `value` is not an object or carries an `error`
    /// that is not a fetch-response payload.
    #[must_use]
    pub fn from_value(value: &WireValue) -> Option<Self> {
        let obj = value.as_object()?;
        let error = match obj.get("error") {
            Some(raw) => Some(serde_json::from_value(raw.clone()).ok()?),
            None => None,
        };
        Some(Self {
            data: obj.get("data").cloned(),
            error,
        })
    }

    /// Wire form; undefined sides are omitted.
    #[must_use]
    pub fn to_value(&self) -> WireValue {
        let mut obj = Map::new();
        if let Some(data) = &self.data {
            obj.insert("data".to_string(), data.clone());
        }
        if let Some(error) = &self.error {
            obj.insert("error".to_string(), error.to_value());
        }
        Value::Object(obj)
    }
}

impl From<WireResult> for WireValue {
    fn from(result: WireResult) -> Self {
        result.to_value()
    }
}
