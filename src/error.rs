//! Error types for the backend layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

/// Maximum number of payload bytes carried in a decode error.
pub const EXCERPT_LIMIT: usize = 256;

// == Backend Error Enum ==
/// Unified error type for the codec and backend facade.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Serialization or compression failed on the write path
    #[error("failed to encode object: {0}")]
    Encode(String),

    /// Malformed payload, corrupt gzip stream or deserialization failure
    #[error("failed to decode object: {context} (payload: {excerpt:?})")]
    Decode {
        /// What went wrong
        context: String,
        /// Bounded rendering of the offending payload
        excerpt: String,
    },

    /// Pass-through failure from the raw engine
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Builds a decode error carrying a bounded excerpt of `payload`.
    pub fn decode(context: impl ToString, payload: &[u8]) -> Self {
        let end = payload.len().min(EXCERPT_LIMIT);
        let mut excerpt = String::from_utf8_lossy(&payload[..end]).into_owned();
        if payload.len() > EXCERPT_LIMIT {
            excerpt.push_str("...");
        }
        BackendError::Decode {
            context: context.to_string(),
            excerpt,
        }
    }

    /// Returns true if the underlying engine reported a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Engine(EngineError::NotFound(_)))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            BackendError::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            BackendError::Engine(EngineError::AlreadyExists(_))
            | BackendError::Engine(EngineError::CompareFailed(_)) => StatusCode::CONFLICT,
            BackendError::Engine(EngineError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            BackendError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BackendError::Encode(_)
            | BackendError::Decode { .. }
            | BackendError::Engine(EngineError::Other(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the backend layer.
pub type Result<T> = std::result::Result<T, BackendError>;
