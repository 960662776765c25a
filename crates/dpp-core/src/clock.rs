//! # Clock Capability
//!
//! Time enters the core exclusively through the [`Clock`] trait so that
//! `last_updated` monotonicity and the `lastChecked` refresh rules stay
//! testable with a controlled clock.

use std::sync::atomic::{AtomicI64, Ordering};
use time::{Duration, OffsetDateTime};

/// Source of the current time for all core mutations.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> OffsetDateTime;
}

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// Wall-clock backed [`Clock`]; the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

// =============================================================================
// MANUAL CLOCK
// =============================================================================

/// A clock that only moves when told to.
///
/// Stores unix nanoseconds in an atomic so shared references can advance
/// it; used by tests that assert timestamp ordering.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub fn starting_at(instant: OffsetDateTime) -> Self {
        let nanos = i64::try_from(instant.unix_timestamp_nanos()).unwrap_or(0);
        Self {
            nanos: AtomicI64::new(nanos),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        let delta = i64::try_from(step.whole_nanoseconds()).unwrap_or(0);
        self.nanos.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let nanos = i128::from(self.nanos.load(Ordering::SeqCst));
        OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

// =============================================================================
// TESTS
// =============================================================================
