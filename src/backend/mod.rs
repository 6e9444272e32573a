//! Backend Module
//!
//! Storage facade composing an engine, the codec and a clock, with a
//! memoization cache for completed operations.

mod facade;
mod memo;
mod stats;

// Re-export public types
pub use facade::Backend;
pub use memo::MemoCache;
pub use stats::BackendStats;
