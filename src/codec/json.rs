//! JSON Codec Module
//!
//! Encodes structured values as JSON, routed through the compressor.
//! The text variants add standard base64 for engines that cannot carry binary data.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::compress::{compress, decompress};
use crate::error::{BackendError, Result};

// == Codec Trait ==
/// Translates between structured values and storable byte/text payloads.
pub trait Codec: Send + Sync {
    /// Serializes `value` and compresses the result.
    fn encode_to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decompresses `data` and deserializes it.
    fn decode_from_bytes<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T>;

    /// Like [`Codec::encode_to_bytes`], then base64.
    fn encode_to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>;

    /// Base64-decodes `data`, then [`Codec::decode_from_bytes`].
    fn decode_from_string<T: DeserializeOwned>(&self, data: &str) -> Result<T>;

    /// Compresses a raw byte payload and base64-encodes it.
    fn encode_bytes_to_string(&self, data: &[u8]) -> Result<String>;

    /// Inverse of [`Codec::encode_bytes_to_string`].
    fn decode_bytes_from_string(&self, data: &str) -> Result<Vec<u8>>;
}

// == JSON Codec ==
/// Stateless JSON codec. Safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a new JsonCodec.
    pub fn new() -> Self {
        Self
    }

    fn unbase64(data: &str) -> Result<Vec<u8>> {
        STANDARD
            .decode(data)
            .map_err(|e| BackendError::decode(format!("invalid base64: {e}"), data.as_bytes()))
    }
}

impl Codec for JsonCodec {
    fn encode_to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let data = serde_json::to_vec(value).map_err(|e| BackendError::Encode(e.to_string()))?;
        compress(&data)
    }

    fn decode_from_bytes<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        let data = decompress(data)?;
        serde_json::from_slice(&data).map_err(|e| BackendError::decode(e, &data))
    }

    fn encode_to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let data = self.encode_to_bytes(value)?;
        Ok(STANDARD.encode(data))
    }

    fn decode_from_string<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let data = Self::unbase64(data)?;
        self.decode_from_bytes(&data)
    }

    fn encode_bytes_to_string(&self, data: &[u8]) -> Result<String> {
        let data = compress(data)?;
        Ok(STANDARD.encode(data))
    }

    fn decode_bytes_from_string(&self, data: &str) -> Result<Vec<u8>> {
        let data = Self::unbase64(data)?;
        decompress(&data)
    }
}
