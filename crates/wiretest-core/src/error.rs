#![forbid(unsafe_code)]

//! Errors raised by wire adapter test doubles.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No adapter | Legacy registration called without an identity | `NoAdapterSpecified`, nothing registered |
//! | Bad status | Error status outside `400..=599` | `InvalidStatus`, nothing delivered |
//! | Flavor mismatch | Identity is already a mock of another flavor | `FlavorMismatch`, nothing registered |
//!
//! Panics raised by data callbacks are not errors of this crate: they unwind
//! through `emit` to the caller.

/// Errors from registry, payload and registration operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A registration entry point was called without an adapter identity.
    NoAdapterSpecified,
    /// An error payload was requested with a status outside `400..=599`.
    InvalidStatus(u16),
    /// The identity is already bound to a mock of an incompatible flavor.
    FlavorMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAdapterSpecified => write!(f, "No adapter specified"),
            Self::InvalidStatus(_) => write!(f, "'status' must be >= 400 or <= 599"),
            Self::FlavorMismatch { expected, found } => {
                write!(f, "adapter is a {found} mock, expected a {expected} mock")
            }
        }
    }
}

impl std::error::Error for WireError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_verbatim() {
        assert_eq!(WireError::NoAdapterSpecified.to_string(), "No adapter specified");
        assert_eq!(
            WireError::InvalidStatus(300).to_string(),
            "'status' must be >= 400 or <= 599"
        );
    }

    #[test]
    fn flavor_mismatch_names_both_flavors() {
        let err = WireError::FlavorMismatch {
            expected: "lds",
            found: "generic",
        };
        let msg = err.to_string();
        assert!(msg.contains("lds"));
        assert!(msg.contains("generic"));
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(WireError::InvalidStatus(600));
        assert!(err.to_string().starts_with("'status'"));
    }
}
