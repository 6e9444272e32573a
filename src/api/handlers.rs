//! API Handlers
//!
//! HTTP request handlers for each backend service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::backend::Backend;
use crate::config::Config;
use crate::engine::{EngineError, MemoryEngine};
use crate::error::{BackendError, Result};
use crate::expiry::{Clock, SystemClock};
use crate::models::{
    BlobResponse, DeleteResponse, HealthResponse, Operation, PutBlobRequest, PutResponse,
    StatsResponse,
};

/// Backend type served over HTTP.
pub type ServiceBackend = Backend<Arc<MemoryEngine>>;

/// Application state shared across all handlers.
///
/// The backend synchronizes internally, so handlers share it without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Storage facade
    pub backend: Arc<ServiceBackend>,
    /// Engine handle kept for maintenance and stats
    pub engine: Arc<MemoryEngine>,
}

impl AppState {
    /// Creates a new AppState over `engine`, using `clock` for TTLs.
    pub fn new(engine: Arc<MemoryEngine>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: Arc::new(Backend::new(engine.clone(), clock)),
            engine,
        }
    }

    /// Creates a new AppState from configuration, backed by the system clock.
    pub fn from_config(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let engine = if config.binary_values {
            MemoryEngine::new(clock.clone())
        } else {
            MemoryEngine::text_only(clock.clone())
        };
        Self::new(Arc::new(engine), clock)
    }
}

/// Handler for PUT /operations
///
/// Creates the operation, or replaces it if the ID already exists.
pub async fn put_operation_handler(
    State(state): State<AppState>,
    Json(operation): Json<Operation>,
) -> Result<Json<PutResponse>> {
    match state.backend.create_operation(&operation) {
        Ok(()) => {}
        Err(BackendError::Engine(EngineError::AlreadyExists(_))) => {
            debug!(id = %operation.id, "operation exists, updating");
            state.backend.update_operation(&operation)?;
        }
        Err(err) => return Err(err),
    }

    Ok(Json(PutResponse::new(operation.id)))
}

/// Handler for GET /operations/:id
pub async fn get_operation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Operation>> {
    let operation = state.backend.get_operation(&id)?;
    Ok(Json(Operation::clone(&operation)))
}

/// Handler for PUT /blobs/:key
///
/// Stores a payload with optional TTL in seconds.
pub async fn put_blob_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutBlobRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(BackendError::InvalidRequest(error_msg));
    }

    let expires = req
        .ttl
        .map(|secs| state.backend.clock().now() + chrono::Duration::seconds(secs as i64));
    state
        .backend
        .upsert_blob(&key, req.value.as_bytes(), expires)?;

    Ok(Json(PutResponse::new(key)))
}

/// Handler for GET /blobs/:key
pub async fn get_blob_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<BlobResponse>> {
    let value = state.backend.get_blob(&key)?;
    Ok(Json(BlobResponse::new(key, &value)))
}

/// Handler for DELETE /blobs/:key
pub async fn delete_blob_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.backend.delete_blob(&key)?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.backend.stats();
    Json(StatsResponse::new(&stats, state.engine.len()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.backend.clock().now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::FakeClock;
    use crate::models::OperationState;

    fn state() -> (Arc<FakeClock>, AppState) {
        let clock = Arc::new(FakeClock::default());
        let engine = Arc::new(MemoryEngine::new(clock.clone()));
        (clock.clone(), AppState::new(engine, clock))
    }

    #[tokio::test]
    async fn test_put_and_get_operation_handler() {
        let (clock, state) = state();
        let op = Operation::new("op-1", "example.com", "install", clock.now());

        let result = put_operation_handler(State(state.clone()), Json(op.clone())).await;
        assert!(result.is_ok());

        let response = get_operation_handler(State(state), Path("op-1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.0, op);
    }

    #[tokio::test]
    async fn test_put_operation_twice_updates() {
        let (clock, state) = state();
        let op = Operation::new("op-1", "example.com", "install", clock.now());
        put_operation_handler(State(state.clone()), Json(op.clone()))
            .await
            .unwrap();

        let done = op.with_state(OperationState::Completed, clock.now());
        put_operation_handler(State(state.clone()), Json(done))
            .await
            .unwrap();

        let response = get_operation_handler(State(state), Path("op-1".to_string()))
            .await
            .unwrap();
        assert!(response.is_completed());
    }

    #[tokio::test]
    async fn test_get_nonexistent_operation() {
        let (_, state) = state();

        let result = get_operation_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_blob_handlers() {
        let (_, state) = state();

        let req = PutBlobRequest {
            value: "payload".to_string(),
            ttl: None,
        };
        put_blob_handler(State(state.clone()), Path("b1".to_string()), Json(req))
            .await
            .unwrap();

        let response = get_blob_handler(State(state.clone()), Path("b1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "payload");

        delete_blob_handler(State(state.clone()), Path("b1".to_string()))
            .await
            .unwrap();
        let result = get_blob_handler(State(state), Path("b1".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_blob_ttl_follows_clock() {
        let (clock, state) = state();

        let req = PutBlobRequest {
            value: "short".to_string(),
            ttl: Some(5),
        };
        put_blob_handler(State(state.clone()), Path("b1".to_string()), Json(req))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(6));
        let result = get_blob_handler(State(state), Path("b1".to_string())).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (_, state) = state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.cache_hits, 0);
        assert_eq!(response.cache_misses, 0);
        assert_eq!(response.engine_entries, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (_, state) = state();
        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_put_blob_invalid_request() {
        let (_, state) = state();

        let req = PutBlobRequest {
            value: "value".to_string(),
            ttl: Some(0),
        };
        let result = put_blob_handler(State(state), Path("b1".to_string()), Json(req)).await;
        assert!(matches!(result, Err(BackendError::InvalidRequest(_))));
    }
}
