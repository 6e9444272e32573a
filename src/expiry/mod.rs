//! Expiry Module
//!
//! Clock abstraction and clock-relative TTL calculation.

mod clock;
mod ttl;

// Re-export public types
pub use clock::{Clock, FakeClock, SystemClock};
pub use ttl::{ttl, Ttl};
