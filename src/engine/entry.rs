//! Engine Entry Module
//!
//! A stored value with its absolute expiration deadline.

use chrono::{DateTime, Utc};

use crate::expiry::Ttl;

// == Engine Entry ==
/// Represents a single engine value with expiry metadata.
#[derive(Debug, Clone)]
pub struct EngineEntry {
    /// The stored payload
    pub value: Vec<u8>,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl EngineEntry {
    // == Constructor ==
    /// Creates a new entry written at `now` with the given TTL.
    pub fn new(value: Vec<u8>, ttl: Ttl, now: DateTime<Utc>) -> Self {
        Self {
            value,
            expires_at: ttl.deadline(now),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches the deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::{Clock, FakeClock};
    use std::time::Duration;

    #[test]
    fn test_entry_creation_forever() {
        let clock = FakeClock::default();
        let entry = EngineEntry::new(b"value".to_vec(), Ttl::Forever, clock.now());

        assert_eq!(entry.value, b"value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(clock.now()));
    }

    #[test]
    fn test_entry_expiration() {
        let clock = FakeClock::default();
        let entry = EngineEntry::new(
            b"value".to_vec(),
            Ttl::After(Duration::from_secs(1)),
            clock.now(),
        );

        assert!(!entry.is_expired(clock.now()));

        clock.advance(chrono::Duration::milliseconds(1100));
        assert!(entry.is_expired(clock.now()));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let clock = FakeClock::default();
        let now = clock.now();
        let entry = EngineEntry {
            value: Vec::new(),
            expires_at: Some(now),
        };

        assert!(entry.is_expired(now), "Entry should be expired at boundary");
    }
}
