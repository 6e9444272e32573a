//! Response DTOs for the backend service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::backend::BackendStats;

/// Response body for GET /blobs/:key
#[derive(Debug, Clone, Serialize)]
pub struct BlobResponse {
    /// The requested key
    pub key: String,
    /// The stored payload
    pub value: String,
}

impl BlobResponse {
    /// Creates a new BlobResponse, rendering the payload as UTF-8 lossily
    pub fn new(key: impl Into<String>, value: &[u8]) -> Self {
        Self {
            key: key.into(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

/// Response body for PUT /operations and PUT /blobs/:key
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /blobs/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Operation reads served from memory
    pub cache_hits: u64,
    /// Operation reads that went to the engine
    pub cache_misses: u64,
    /// Completed operations held in memory
    pub cached_operations: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entries currently held by the engine
    pub engine_entries: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from backend statistics
    pub fn new(stats: &BackendStats, engine_entries: usize) -> Self {
        Self {
            cache_hits: stats.cache_hits,
            cache_misses: stats.cache_misses,
            cached_operations: stats.cached_operations,
            hit_rate: stats.hit_rate(),
            engine_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse stamped with `now`
    pub fn healthy(now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_response_serialize() {
        let resp = BlobResponse::new("test_key", b"test_value");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains("test_value"));
    }

    #[test]
    fn test_put_response_serialize() {
        let resp = PutResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = BackendStats {
            cache_hits: 80,
            cache_misses: 20,
            cached_operations: 5,
        };
        let resp = StatsResponse::new(&stats, 100);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.engine_entries, 100);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(chrono::Utc::now());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
