//! Time source abstraction for deterministic testing.
//!
//! Record timestamps and token expiry both read the clock through the
//! `TimeSource` trait, so tests can pin or advance time instead of sleeping.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Abstraction over time operations.
///
/// This trait allows swapping between real system time and a manually
/// driven clock in tests.
pub trait TimeSource: Send + Sync {
    /// Get the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;

    /// Get the current time in whole seconds since Unix epoch.
    fn now_secs(&self) -> u64 {
        self.now_ms() / 1000
    }

    /// Get the current time as a UTC timestamp.
    fn now(&self) -> DateTime<Utc> {
        timestamp_from_ms(self.now_ms())
    }
}

/// Real time source using system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[allow(clippy::cast_possible_truncation)] // Milliseconds won't overflow u64 for billions of years
    fn now_ms(&self) -> u64 {
        // duration_since(UNIX_EPOCH) only fails if system time is before 1970.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Convert milliseconds since Unix epoch into a UTC timestamp.
///
/// Out-of-range values clamp to the epoch.
#[must_use]
pub fn timestamp_from_ms(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now_ms: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl ManualTimeSource {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now_ms: std::sync::atomic::AtomicU64::new(start_ms),
        }
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms
            .fetch_add(delta_ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let source = SystemTimeSource;
        let t1 = source.now_ms();
        let t2 = source.now_ms();

        // Time should be reasonable (after 2020)
        assert!(t1 > 1_577_836_800_000); // 2020-01-01 00:00:00 UTC

        // Time should not go backwards
        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_time_source_advances() {
        let clock = ManualTimeSource::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        assert_eq!(clock.now_secs(), 1);

        clock.advance_ms(2_500);
        assert_eq!(clock.now_ms(), 3_500);
        assert_eq!(clock.now_secs(), 3);

        clock.set_ms(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_timestamp_from_ms() {
        let ts = timestamp_from_ms(1_700_000_000_123);
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.123+00:00");
    }

    #[test]
    fn test_timestamp_from_ms_out_of_range_clamps_to_epoch() {
        assert_eq!(timestamp_from_ms(u64::MAX).timestamp_millis(), 0);
    }
}
