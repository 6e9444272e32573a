//! API Module
//!
//! HTTP handlers and routing for the backend service.
//!
//! # Endpoints
//! - `PUT /operations` - Create or replace an operation
//! - `GET /operations/:id` - Retrieve an operation
//! - `PUT /blobs/:key` - Store a payload
//! - `GET /blobs/:key` - Retrieve a payload
//! - `DELETE /blobs/:key` - Delete a payload
//! - `GET /stats` - Get backend statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
