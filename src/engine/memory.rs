//! Memory Engine Module
//!
//! In-memory engine with clock-driven expiry. Serves as the reference engine
//! for the service binary and as the fake engine in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::engine::{Engine, EngineEntry, EngineError};
use crate::expiry::{Clock, Ttl};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024; // 10 MB

// == Memory Engine ==
/// HashMap-backed engine. Expired entries are invisible to reads and
/// removed by [`MemoryEngine::purge_expired`].
#[derive(Debug)]
pub struct MemoryEngine {
    /// Key-value storage
    entries: RwLock<HashMap<String, EngineEntry>>,
    /// Time source for deadlines
    clock: Arc<dyn Clock>,
    /// Whether values may hold arbitrary bytes
    binary_safe: bool,
    /// Number of `get` calls served
    reads: AtomicU64,
    /// Set once `close` has been called
    closed: AtomicBool,
}

impl MemoryEngine {
    // == Constructor ==
    /// Creates a new binary-safe MemoryEngine.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            binary_safe: true,
            reads: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a MemoryEngine that only accepts text payloads.
    pub fn text_only(clock: Arc<dyn Clock>) -> Self {
        Self {
            binary_safe: false,
            ..Self::new(clock)
        }
    }

    // == Reads ==
    /// Returns the number of `get` calls made against this engine.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the engine holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns true once the engine has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn check_open(&self) -> Result<(), EngineError> {
        if self.is_closed() {
            return Err(EngineError::Closed);
        }
        Ok(())
    }

    fn validate(&self, key: &str, value: &[u8]) -> Result<(), EngineError> {
        self.check_open()?;

        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(EngineError::Other(format!(
                "Key must be between 1 and {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(EngineError::Other(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if !self.binary_safe && std::str::from_utf8(value).is_err() {
            return Err(EngineError::Other(format!(
                "Value for {key} is not valid text"
            )));
        }

        Ok(())
    }

    /// Looks up a live entry, treating expired entries as absent.
    fn live<'a>(
        entries: &'a HashMap<String, EngineEntry>,
        key: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<&'a EngineEntry> {
        entries.get(key).filter(|entry| !entry.is_expired(now))
    }
}

impl Engine for MemoryEngine {
    fn create(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        self.validate(key, &value)?;
        let now = self.clock.now();

        let mut entries = self.entries.write();
        if Self::live(&entries, key, now).is_some() {
            return Err(EngineError::AlreadyExists(key.to_string()));
        }
        entries.insert(key.to_string(), EngineEntry::new(value, ttl, now));

        debug!(key, ?ttl, "created key");
        Ok(())
    }

    fn update(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        self.validate(key, &value)?;
        let now = self.clock.now();

        let mut entries = self.entries.write();
        if Self::live(&entries, key, now).is_none() {
            return Err(EngineError::NotFound(key.to_string()));
        }
        entries.insert(key.to_string(), EngineEntry::new(value, ttl, now));

        debug!(key, ?ttl, "updated key");
        Ok(())
    }

    fn upsert(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), EngineError> {
        self.validate(key, &value)?;
        let now = self.clock.now();

        self.entries
            .write()
            .insert(key.to_string(), EngineEntry::new(value, ttl, now));

        debug!(key, ?ttl, "upserted key");
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
        ttl: Ttl,
    ) -> Result<(), EngineError> {
        self.validate(key, &value)?;
        let now = self.clock.now();

        let mut entries = self.entries.write();
        match Self::live(&entries, key, now) {
            None => return Err(EngineError::NotFound(key.to_string())),
            Some(entry) if entry.value != expected => {
                return Err(EngineError::CompareFailed(key.to_string()));
            }
            Some(_) => {}
        }
        entries.insert(key.to_string(), EngineEntry::new(value, ttl, now));

        debug!(key, ?ttl, "swapped key");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, EngineError> {
        self.check_open()?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        let now = self.clock.now();

        let entries = self.entries.read();
        Self::live(&entries, key, now)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| EngineError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), EngineError> {
        self.check_open()?;
        let now = self.clock.now();

        let mut entries = self.entries.write();
        match entries.remove(key) {
            Some(entry) if !entry.is_expired(now) => Ok(()),
            _ => Err(EngineError::NotFound(key.to_string())),
        }
    }

    fn close(&self) -> Result<(), EngineError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(EngineError::Closed);
        }
        self.entries.write().clear();
        debug!("memory engine closed");
        Ok(())
    }

    fn binary_safe(&self) -> bool {
        self.binary_safe
    }
}
