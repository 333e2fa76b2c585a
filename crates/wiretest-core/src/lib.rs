#![forbid(unsafe_code)]

//! Core: adapter instance registry and emission fan-out engine.
//!
//! # Role in wiretest
//! `wiretest-core` owns the state behind every mocked wire adapter: the set
//! of live [`AdapterInstance`]s for one adapter identity, the last config any
//! of them reported, and the fan-out that delivers test-triggered values to
//! them. The `wiretest` crate layers flavor policies and registration entry
//! points on top.
//!
//! # Primary responsibilities
//! - **AdapterRegistry**: live set membership, last config, filtered broadcast.
//! - **AdapterInstance**: per-usage data callback, config and lifecycle.
//! - **Error payloads**: fetch-response failures with status validation.
//! - **Host boundary**: [`WireAdapter`] and [`WireAdapterConstructor`].
//!
//! # Concurrency
//! Everything is single-threaded (`Rc<RefCell<..>>`) and synchronous. No
//! borrow is held across a data callback, so callbacks may re-enter.

pub mod adapter;
pub mod config;
pub mod error;
pub mod instance;
pub mod payload;
pub mod registry;

pub use adapter::{SharedConstructor, WireAdapter, WireAdapterConstructor};
pub use config::{WireConfig, WireValue, config_from, empty_config};
pub use error::WireError;
pub use instance::{AdapterInstance, DataCallback, Lifecycle};
pub use payload::{
    ErrorDefaults, ErrorOptions, ErrorPayload, WireResult, build_error_payload, validate_status,
};
pub use registry::{AdapterRegistry, ConfigFilter};
