#![forbid(unsafe_code)]

//! Flavor policies: how a mock shapes emissions and errors.
//!
//! All flavors share one registry/instance engine; a [`FlavorPolicy`] is the
//! only thing that differs between them.
//!
//! | Flavor | Emission shape | Error channel | On construct |
//! |--------|----------------|---------------|--------------|
//! | Generic | value as-is | none | register |
//! | Lds | `{ data }` | `{ error }`, NOT_FOUND defaults | register, emit `{}` |
//! | Apex | `{ data }` | `{ error }`, Bad Request defaults | register, emit `{}` |

use wiretest_core::{ErrorDefaults, ErrorPayload, WireResult, WireValue};

/// Which public contract a mock exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorKind {
    Generic,
    Lds,
    Apex,
}

impl FlavorKind {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Lds => "lds",
            Self::Apex => "apex",
        }
    }

    /// Whether the flavor delivers `{ data, error }` envelopes.
    #[must_use]
    pub const fn is_data_service(self) -> bool {
        matches!(self, Self::Lds | Self::Apex)
    }
}

impl std::fmt::Display for FlavorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn identity(value: WireValue) -> WireValue {
    value
}

fn data_envelope(value: WireValue) -> WireValue {
    WireResult::data(value).to_value()
}

fn error_envelope(payload: ErrorPayload) -> WireValue {
    WireResult::error(payload).to_value()
}

fn bare_error(payload: ErrorPayload) -> WireValue {
    payload.to_value()
}

/// Emission and error policy of a mock.
#[derive(Debug, Clone)]
pub struct FlavorPolicy {
    pub kind: FlavorKind,
    /// Applied to every emitted value before fan-out.
    pub shape_emit: fn(WireValue) -> WireValue,
    /// Applied to every error payload before fan-out.
    pub shape_error: fn(ErrorPayload) -> WireValue,
    /// Defaults for omitted error fields; `None` means no error channel.
    pub error_defaults: Option<ErrorDefaults>,
    /// Delivered to each new instance right after construction.
    pub initial_value: Option<WireValue>,
    /// Join the live set at construction rather than at first connect.
    pub register_on_construct: bool,
}

impl FlavorPolicy {
    /// Bare values, no error channel.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            kind: FlavorKind::Generic,
            shape_emit: identity,
            shape_error: bare_error,
            error_defaults: None,
            initial_value: None,
            register_on_construct: true,
        }
    }

    /// Record-service envelopes with NOT_FOUND defaults.
    #[must_use]
    pub fn lds() -> Self {
        Self::data_service(FlavorKind::Lds, ErrorDefaults::lds())
    }

    /// RPC-method envelopes with Bad Request defaults.
    #[must_use]
    pub fn apex() -> Self {
        Self::data_service(FlavorKind::Apex, ErrorDefaults::apex())
    }

    fn data_service(kind: FlavorKind, defaults: ErrorDefaults) -> Self {
        Self {
            kind,
            shape_emit: data_envelope,
            shape_error: error_envelope,
            error_defaults: Some(defaults),
            initial_value: Some(WireResult::empty().to_value()),
            register_on_construct: true,
        }
    }

    /// Replace the default error profile.
    #[must_use]
    pub fn with_error_defaults(mut self, defaults: ErrorDefaults) -> Self {
        self.error_defaults = Some(defaults);
        self
    }

    /// Replace (or remove) the value delivered on construction.
    #[must_use]
    pub fn with_initial_value(mut self, value: Option<WireValue>) -> Self {
        self.initial_value = value;
        self
    }

    /// Choose whether construction alone makes an instance live.
    #[must_use]
    pub fn register_on_construct(mut self, enabled: bool) -> Self {
        self.register_on_construct = enabled;
        self
    }

    /// Shape a value for fan-out.
    #[must_use]
    pub fn shape(&self, value: WireValue) -> WireValue {
        (self.shape_emit)(value)
    }

    /// Shape an error payload for fan-out.
    #[must_use]
    pub fn shape_failure(&self, payload: ErrorPayload) -> WireValue {
        (self.shape_error)(payload)
    }
}

impl Default for FlavorPolicy {
    fn default() -> Self {
        Self::generic()
    }
}
