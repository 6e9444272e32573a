//! Engine Module
//!
//! Narrow contract for the raw key-value engine, plus an in-memory implementation.

mod entry;
mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::expiry::Ttl;

// Re-export public types
pub use entry::EngineEntry;
pub use memory::{MemoryEngine, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Engine Error ==
/// Failure reported by the raw engine. Not interpreted by the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key already exists
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Stored value did not match the expected value
    #[error("Compare failed: {0}")]
    CompareFailed(String),

    /// Engine handle has been closed
    #[error("Engine is closed")]
    Closed,

    /// Any other engine failure
    #[error("Engine error: {0}")]
    Other(String),
}

// == Engine Trait ==
/// Raw key-value store primitives. Every write carries a [`Ttl`].
pub trait Engine: Send + Sync {
    /// Stores `value` under `key`, failing if the key exists.
    fn create(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError>;

    /// Replaces the value under an existing `key`.
    fn update(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError>;

    /// Stores `value` under `key` whether or not it exists.
    fn upsert(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError>;

    /// Replaces the value under `key` only if it currently equals `expected`.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
        ttl: Ttl,
    ) -> Result<(), EngineError>;

    /// Returns the value under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, EngineError>;

    /// Removes `key`.
    fn delete(&self, key: &str) -> Result<(), EngineError>;

    /// Closes the engine handle.
    fn close(&self) -> Result<(), EngineError>;

    /// Whether values may hold arbitrary bytes. Text-only engines get base64 payloads.
    fn binary_safe(&self) -> bool {
        true
    }
}

impl<E: Engine + ?Sized> Engine for Arc<E> {
    fn create(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        (**self).create(key, value, ttl)
    }

    fn update(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        (**self).update(key, value, ttl)
    }

    fn upsert(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        (**self).upsert(key, value, ttl)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
        ttl: Ttl,
    ) -> Result<(), EngineError> {
        (**self).compare_and_swap(key, expected, value, ttl)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, EngineError> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<(), EngineError> {
        (**self).delete(key)
    }

    fn close(&self) -> Result<(), EngineError> {
        (**self).close()
    }

    fn binary_safe(&self) -> bool {
        (**self).binary_safe()
    }
}
