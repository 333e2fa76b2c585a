#![forbid(unsafe_code)]

//! Host boundary of the wire protocol.
//!
//! The host framework constructs one adapter per component usage through a
//! [`WireAdapterConstructor`], then drives it with [`WireAdapter`] lifecycle
//! calls. Values flow back through the [`DataCallback`] handed to the
//! constructor.

use std::rc::Rc;

use crate::config::WireConfig;
use crate::instance::{AdapterInstance, DataCallback};

/// Lifecycle contract the host drives for each component usage.
pub trait WireAdapter {
    /// New reactive parameters were computed.
    fn update(&self, config: WireConfig);
    /// The component was attached.
    fn connect(&self);
    /// The component was detached.
    fn disconnect(&self);
}

/// Creates adapters for component usages.
pub trait WireAdapterConstructor {
    fn construct(&self, callback: DataCallback) -> Box<dyn WireAdapter>;
}

impl<F> WireAdapterConstructor for F
where
    F: Fn(DataCallback) -> Box<dyn WireAdapter>,
{
    fn construct(&self, callback: DataCallback) -> Box<dyn WireAdapter> {
        self(callback)
    }
}

impl WireAdapter for AdapterInstance {
    fn update(&self, config: WireConfig) {
        AdapterInstance::update(self, config);
    }

    fn connect(&self) {
        AdapterInstance::connect(self);
    }

    fn disconnect(&self) {
        AdapterInstance::disconnect(self);
    }
}

/// Shared, type-erased constructor as stored by binding tables.
pub type SharedConstructor = Rc<dyn WireAdapterConstructor>;
