//! Backend Facade Module
//!
//! Composes a raw engine with the codec and clock-relative TTLs, and memoizes
//! completed operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::stats::StatsCounters;
use crate::backend::{BackendStats, MemoCache};
use crate::codec::{compress, decompress, Codec, JsonCodec};
use crate::engine::Engine;
use crate::error::{BackendError, Result};
use crate::expiry::{ttl, Clock, Ttl};
use crate::models::Operation;

const OPERATIONS_PREFIX: &str = "/operations";
const BLOBS_PREFIX: &str = "/blobs";

fn operation_key(id: &str) -> String {
    format!("{OPERATIONS_PREFIX}/{id}")
}

fn blob_key(key: &str) -> String {
    format!("{BLOBS_PREFIX}/{key}")
}

// == Backend ==
/// Storage facade over a raw [`Engine`].
///
/// Values are encoded with [`JsonCodec`]; text-only engines receive the base64
/// representation. The facade spawns no tasks of its own.
#[derive(Debug)]
pub struct Backend<E: Engine> {
    /// Raw engine handle, closed by [`Backend::close`]
    engine: E,
    /// Time source for TTL computation
    clock: Arc<dyn Clock>,
    codec: JsonCodec,
    /// Operations that reached a terminal state
    completed_operations: MemoCache<Operation>,
    stats: StatsCounters,
}

impl<E: Engine> Backend<E> {
    // == Constructor ==
    /// Creates a new Backend over `engine`, computing TTLs against `clock`.
    pub fn new(engine: E, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine,
            clock,
            codec: JsonCodec::new(),
            completed_operations: MemoCache::new(),
            stats: StatsCounters::default(),
        }
    }

    /// Returns the codec used for stored values.
    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Returns the backend clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // == TTL ==
    /// Computes the engine TTL for a value expiring at `expires`.
    pub fn ttl(&self, expires: Option<DateTime<Utc>>) -> Ttl {
        ttl(self.clock.as_ref(), expires)
    }

    // == Close ==
    /// Closes the underlying engine. Consumes the backend so it happens once.
    pub fn close(self) -> Result<()> {
        self.engine.close()?;
        info!("backend closed");
        Ok(())
    }

    // == Stats ==
    /// Returns current read statistics.
    pub fn stats(&self) -> BackendStats {
        self.stats.snapshot(self.completed_operations.len())
    }

    // == Operations ==
    /// Stores a new operation. Fails if the ID is taken.
    pub fn create_operation(&self, operation: &Operation) -> Result<()> {
        validate_operation(operation)?;
        let data = self.encode(operation)?;
        self.engine
            .create(&operation_key(&operation.id), data, Ttl::Forever)?;
        debug!(id = %operation.id, state = ?operation.state, "created operation");
        Ok(())
    }

    /// Replaces an existing operation.
    ///
    /// Completed operations are immutable. The write is swapped against the
    /// value just read, so a concurrent change fails with `CompareFailed`.
    pub fn update_operation(&self, operation: &Operation) -> Result<()> {
        validate_operation(operation)?;
        self.ensure_mutable(&operation.id)?;

        let key = operation_key(&operation.id);
        let current_data = self.engine.get(&key)?;
        let current: Operation = self.decode(&key, &current_data)?;
        if current.is_completed() {
            return Err(completed_error(&operation.id));
        }

        let data = self.encode(operation)?;
        self.engine
            .compare_and_swap(&key, &current_data, data, Ttl::Forever)?;
        debug!(id = %operation.id, state = ?operation.state, "updated operation");
        Ok(())
    }

    /// Replaces `expected` with `updated` if the stored operation still equals `expected`.
    pub fn compare_and_swap_operation(
        &self,
        expected: &Operation,
        updated: &Operation,
    ) -> Result<()> {
        validate_operation(updated)?;
        if expected.id != updated.id {
            return Err(BackendError::InvalidRequest(format!(
                "cannot swap operation {} with {}",
                expected.id, updated.id
            )));
        }
        if expected.is_completed() {
            return Err(completed_error(&expected.id));
        }
        self.ensure_mutable(&updated.id)?;

        let expected_data = self.encode(expected)?;
        let data = self.encode(updated)?;
        self.engine.compare_and_swap(
            &operation_key(&updated.id),
            &expected_data,
            data,
            Ttl::Forever,
        )?;
        debug!(id = %updated.id, state = ?updated.state, "swapped operation");
        Ok(())
    }

    /// Returns the operation with `id`.
    ///
    /// Completed operations are served from memory after the first read.
    pub fn get_operation(&self, id: &str) -> Result<Arc<Operation>> {
        if let Some(operation) = self.completed_operations.get(id) {
            self.stats.record_hit();
            debug!(id, "operation served from cache");
            return Ok(operation);
        }
        self.stats.record_miss();

        let key = operation_key(id);
        let data = self.engine.get(&key)?;
        let operation: Operation = self.decode(&key, &data)?;

        if operation.is_completed() {
            info!(id, state = ?operation.state, "caching completed operation");
            return Ok(self.completed_operations.insert_if_absent(id, operation));
        }
        Ok(Arc::new(operation))
    }

    // == Blobs ==
    /// Stores a raw byte payload, expiring at `expires` if set.
    pub fn upsert_blob(
        &self,
        key: &str,
        data: &[u8],
        expires: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(BackendError::InvalidRequest(
                "Key cannot be empty".to_string(),
            ));
        }
        let ttl = self.ttl(expires);
        let data = self.encode_bytes(data)?;
        self.engine.upsert(&blob_key(key), data, ttl)?;
        debug!(key, ?ttl, "stored blob");
        Ok(())
    }

    /// Returns the raw byte payload stored under `key`.
    pub fn get_blob(&self, key: &str) -> Result<Vec<u8>> {
        let key = blob_key(key);
        let data = self.engine.get(&key)?;
        self.decode_bytes(&key, &data)
    }

    /// Removes the payload stored under `key`.
    pub fn delete_blob(&self, key: &str) -> Result<()> {
        self.engine.delete(&blob_key(key))?;
        Ok(())
    }

    // == Encoding ==
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        if self.engine.binary_safe() {
            self.codec.encode_to_bytes(value)
        } else {
            Ok(self.codec.encode_to_string(value)?.into_bytes())
        }
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, data: &[u8]) -> Result<T> {
        let result = if self.engine.binary_safe() {
            self.codec.decode_from_bytes(data)
        } else {
            as_text(data).and_then(|text| self.codec.decode_from_string(text))
        };
        log_decode_failure(key, result)
    }

    fn encode_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        if self.engine.binary_safe() {
            compress(data)
        } else {
            Ok(self.codec.encode_bytes_to_string(data)?.into_bytes())
        }
    }

    fn decode_bytes(&self, key: &str, data: &[u8]) -> Result<Vec<u8>> {
        let result = if self.engine.binary_safe() {
            decompress(data)
        } else {
            as_text(data).and_then(|text| self.codec.decode_bytes_from_string(text))
        };
        log_decode_failure(key, result)
    }

    fn ensure_mutable(&self, id: &str) -> Result<()> {
        if self.completed_operations.get(id).is_some() {
            return Err(completed_error(id));
        }
        Ok(())
    }
}

fn completed_error(id: &str) -> BackendError {
    BackendError::InvalidRequest(format!(
        "operation {id} is completed and cannot be modified"
    ))
}

fn validate_operation(operation: &Operation) -> Result<()> {
    match operation.validate() {
        Some(message) => Err(BackendError::InvalidRequest(message)),
        None => Ok(()),
    }
}

fn as_text(data: &[u8]) -> Result<&str> {
    std::str::from_utf8(data).map_err(|e| BackendError::decode(e, data))
}

fn log_decode_failure<T>(key: &str, result: Result<T>) -> Result<T> {
    if let Err(BackendError::Decode { context, excerpt }) = &result {
        warn!(key, %context, %excerpt, "failed to decode stored value");
    }
    result
}
