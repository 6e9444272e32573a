//! Domain records and HTTP models
//!
//! The operation record persisted through the backend, plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod operation;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use operation::{Operation, OperationState};
pub use requests::PutBlobRequest;
pub use responses::{BlobResponse, DeleteResponse, HealthResponse, PutResponse, StatsResponse};
