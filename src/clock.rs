//! Wall-clock abstraction so time-of-day badge rules stay testable.

use chrono::{Local, Timelike};

/// Source of the current instant and local hour.
///
/// Transitions never read the ambient system clock; callers capture a
/// [`Moment`] from a clock and pass it in, keeping the ledger deterministic.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
    /// Local hour of day in `[0, 24)`.
    fn local_hour(&self) -> u8;
}

/// Real clock backed by the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Local::now().timestamp_millis().max(0) as u64
    }

    fn local_hour(&self) -> u8 {
        Local::now().hour() as u8
    }
}

/// Frozen clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// Reported timestamp.
    pub now_ms: u64,
    /// Reported local hour.
    pub hour: u8,
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn local_hour(&self) -> u8 {
        self.hour
    }
}

/// Instant handed to ledger transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// Milliseconds since the Unix epoch.
    pub ts_ms: u64,
    /// Local hour of day in `[0, 24)`.
    pub local_hour: u8,
}

impl Moment {
    /// Captures the current moment from `clock`.
    pub fn capture(clock: &dyn Clock) -> Self {
        Self {
            ts_ms: clock.now_ms(),
            local_hour: clock.local_hour(),
        }
    }
}
