#![forbid(unsafe_code)]

//! Adapter identities.
//!
//! An [`AdapterId`] is what a component names in its wire declaration. Plain
//! identifiers stand for a real adapter the host knows about; identities
//! created by the `create_*` factories carry the [`MockEngine`] of their mock,
//! which is how the legacy registration path recognizes an existing mock.
//!
//! Equality and hashing use identity, never the name: two identifiers with
//! the same name are different adapters.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::mock::MockEngine;

static NEXT_ADAPTER_KEY: AtomicU64 = AtomicU64::new(1);

struct AdapterIdInner {
    key: u64,
    name: String,
    engine: Option<MockEngine>,
}

/// Identity of a wire adapter.
#[derive(Clone)]
pub struct AdapterId {
    inner: Rc<AdapterIdInner>,
}

impl AdapterId {
    /// A real adapter identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    pub(crate) fn for_mock(name: impl Into<String>, engine: MockEngine) -> Self {
        Self::build(name.into(), Some(engine))
    }

    fn build(name: String, engine: Option<MockEngine>) -> Self {
        Self {
            inner: Rc::new(AdapterIdInner {
                key: NEXT_ADAPTER_KEY.fetch_add(1, Ordering::Relaxed),
                name,
                engine,
            }),
        }
    }

    /// Stable key for table lookups.
    #[must_use]
    pub fn key(&self) -> u64 {
        self.inner.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The mock engine, when this identity is itself a mock.
    #[must_use]
    pub fn engine(&self) -> Option<&MockEngine> {
        self.inner.engine.as_ref()
    }

    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.inner.engine.is_some()
    }
}

impl PartialEq for AdapterId {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AdapterId {}

impl std::hash::Hash for AdapterId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl std::fmt::Debug for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterId")
            .field("key", &self.inner.key)
            .field("name", &self.inner.name)
            .field("mock", &self.inner.engine.as_ref().map(MockEngine::kind))
            .finish()
    }
}

impl std::fmt::Display for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner.name)
    }
}
