//! Key-value backend codec and expiry layer
//!
//! Encodes structured values for a size-constrained key-value engine with
//! transparent gzip compression, computes clock-relative TTLs, and memoizes
//! reads of operations that can no longer change.

pub mod api;
pub mod backend;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod expiry;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use backend::Backend;
pub use config::Config;
pub use error::{BackendError, Result};
pub use tasks::spawn_cleanup_task;
