//! Request DTOs for the backend service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Longest accepted TTL in seconds (ten years)
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Request body for storing a blob (PUT /blobs/:key)
///
/// # Fields
/// - `value`: The payload to store
/// - `ttl`: Optional TTL in seconds (no expiry if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct PutBlobRequest {
    /// The payload to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl PutBlobRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.ttl {
            Some(0) => Some("TTL must be at least 1 second".to_string()),
            Some(ttl) if ttl > MAX_TTL_SECS => Some(format!(
                "TTL exceeds maximum of {} seconds",
                MAX_TTL_SECS
            )),
            _ => None,
        }
    }
}
