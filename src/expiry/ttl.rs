//! TTL Module
//!
//! Converts absolute expiration timestamps into relative engine TTLs.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::expiry::Clock;

// == Ttl ==
/// Relative expiry attached to an engine write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// No expiration
    #[default]
    Forever,
    /// Expires after the given span
    After(Duration),
}

impl Ttl {
    /// Returns the absolute deadline relative to `now`, or None if forever.
    pub fn deadline(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Ttl::Forever => None,
            Ttl::After(span) => Some(
                chrono::Duration::from_std(*span)
                    .ok()
                    .and_then(|span| now.checked_add_signed(span))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
        }
    }
}

// == TTL Calculation ==
/// Computes the TTL for a value expiring at `expires` as seen by `clock`.
///
/// An unset timestamp means forever. So does a timestamp at or before
/// `clock.now()`: already-expired values are written without expiry rather
/// than expiring immediately.
pub fn ttl(clock: &dyn Clock, expires: Option<DateTime<Utc>>) -> Ttl {
    let Some(expires) = expires else {
        return Ttl::Forever;
    };

    let diff = expires - clock.now();
    match diff.to_std() {
        Ok(span) if !span.is_zero() => Ttl::After(span),
        _ => Ttl::Forever,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::FakeClock;

    #[test]
    fn test_unset_timestamp_is_forever() {
        let clock = FakeClock::default();
        assert_eq!(ttl(&clock, None), Ttl::Forever);
    }

    #[test]
    fn test_future_timestamp_is_exact_difference() {
        let clock = FakeClock::default();
        let expires = clock.now() + chrono::Duration::seconds(3600);

        assert_eq!(ttl(&clock, Some(expires)), Ttl::After(Duration::from_secs(3600)));
    }

    #[test]
    fn test_subsecond_difference_is_preserved() {
        let clock = FakeClock::default();
        let expires = clock.now() + chrono::Duration::milliseconds(1500);

        assert_eq!(ttl(&clock, Some(expires)), Ttl::After(Duration::from_millis(1500)));
    }

    // Regression: an expiry already in the past is treated as "never expires",
    // not "expire immediately". Pinned until product confirms the intent.
    #[test]
    fn test_past_timestamp_is_forever() {
        let clock = FakeClock::default();
        let expires = clock.now() - chrono::Duration::seconds(1);

        assert_eq!(ttl(&clock, Some(expires)), Ttl::Forever);
    }

    #[test]
    fn test_timestamp_equal_to_now_is_forever() {
        let clock = FakeClock::default();
        assert_eq!(ttl(&clock, Some(clock.now())), Ttl::Forever);
    }

    #[test]
    fn test_ttl_tracks_clock() {
        let clock = FakeClock::default();
        let expires = clock.now() + chrono::Duration::seconds(60);

        clock.advance(chrono::Duration::seconds(45));
        assert_eq!(ttl(&clock, Some(expires)), Ttl::After(Duration::from_secs(15)));

        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(ttl(&clock, Some(expires)), Ttl::Forever);
    }

    #[test]
    fn test_deadline() {
        let clock = FakeClock::default();
        let now = clock.now();

        assert_eq!(Ttl::Forever.deadline(now), None);
        assert_eq!(
            Ttl::After(Duration::from_secs(10)).deadline(now),
            Some(now + chrono::Duration::seconds(10))
        );
    }

    #[test]
    fn test_deadline_saturates() {
        let clock = FakeClock::default();
        let deadline = Ttl::After(Duration::MAX).deadline(clock.now());
        assert_eq!(deadline, Some(DateTime::<Utc>::MAX_UTC));
    }
}
