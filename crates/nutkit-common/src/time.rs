// ============================================
// File: crates/nutkit-common/src/time.rs
// ============================================
//! # Time Utilities
//!
//! ## Creation Reason
//! Nut expiry is a pure function of wall-clock time compared at validation
//! time. This module gives that comparison a single source of "now" that
//! tests can pin.
//!
//! ## Main Functionality
//! - `Timestamp`: Unix timestamp in seconds, with the 32-bit big-endian
//!   form stored inside a nut payload
//! - `Clock`: Source of the current time
//! - `SystemClock`: Wall-clock implementation
//! - `ManualClock`: Atomic, settable clock for deterministic tests
//!
//! ## ⚠️ Important Note for Next Developer
//! - The payload stores seconds as `u32`; `to_be_u32` wraps in 2106
//! - `ManualClock` uses `AtomicI64` so it can be shared across threads
//!
//! ## Last Modified
//! v0.1.0 - Initial time utilities

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ============================================
// Timestamp
// ============================================

/// Unix timestamp in seconds.
///
/// # Example
/// ```
/// use nutkit_common::time::Timestamp;
///
/// let issued = Timestamp::from_secs(1_700_000_000);
/// let bytes = issued.to_be_u32().to_be_bytes();
/// let restored = Timestamp::from_be_u32(u32::from_be_bytes(bytes));
/// assert_eq!(issued, restored);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a new timestamp from Unix seconds.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Creates a timestamp for the current wall-clock time.
    ///
    /// A system clock set before the Unix epoch reads as `0`.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Returns the Unix timestamp in seconds.
    #[must_use]
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// Returns the low 32 bits of the timestamp, as stored in a payload.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn to_be_u32(&self) -> u32 {
        self.0 as u32
    }

    /// Recovers a timestamp from its 32-bit payload form.
    #[must_use]
    pub const fn from_be_u32(secs: u32) -> Self {
        Self(secs as i64)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` lies in the future.
    #[must_use]
    pub const fn elapsed_since(&self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this timestamp shifted forward by `duration`.
    #[must_use]
    pub fn add(&self, duration: Duration) -> Self {
        let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// ============================================
// Clock
// ============================================

/// Source of the current time.
///
/// Implementations must be `Send + Sync`; a single clock is shared by
/// every issuance and validation call of a service.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the operating system's wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Settable clock for tests and simulations.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use nutkit_common::time::{Clock, ManualClock};
///
/// let clock = ManualClock::at(1_000);
/// clock.advance(Duration::from_secs(300));
/// assert_eq!(clock.now().as_secs(), 1_300);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Creates a clock reading `secs` Unix seconds.
    #[must_use]
    pub const fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// Creates a clock starting at the current wall-clock time.
    #[must_use]
    pub fn starting_now() -> Self {
        Self::at(Timestamp::now().as_secs())
    }

    /// Sets the clock to `secs` Unix seconds.
    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::SeqCst))
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_timestamp_now_is_after_2020() {
        assert!(Timestamp::now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn test_payload_form_roundtrip() {
        let ts = Timestamp::from_secs(1_700_000_123);
        assert_eq!(Timestamp::from_be_u32(ts.to_be_u32()), ts);
    }

    #[test]
    fn test_elapsed_since() {
        let issued = Timestamp::from_secs(1_000);
        assert_eq!(Timestamp::from_secs(1_300).elapsed_since(issued), 300);
        assert_eq!(Timestamp::from_secs(900).elapsed_since(issued), -100);
    }

    #[test]
    fn test_add_duration() {
        let ts = Timestamp::from_secs(10).add(Duration::from_secs(5));
        assert_eq!(ts.as_secs(), 15);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Timestamp::from_secs(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::at(100);
        assert_eq!(clock.now().as_secs(), 100);

        clock.advance(Duration::from_secs(20));
        assert_eq!(clock.now().as_secs(), 120);

        clock.set(5);
        assert_eq!(clock.now().as_secs(), 5);
    }

    #[test]
    fn test_manual_clock_shared_across_threads() {
        let clock = Arc::new(ManualClock::at(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || clock.advance(Duration::from_secs(1)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clock.now().as_secs(), 8);
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let diff = SystemClock.now().elapsed_since(Timestamp::now());
        assert!(diff.abs() <= 1);
    }
}
