//! Wraparound-safe elapsed-time accounting for the connection attempt loop.
//!
//! Timestamps are 32-bit millisecond ticks that wrap roughly every 49.7 days
//! of uptime.  Elapsed time must therefore be computed with wrapping
//! subtraction; comparing raw tick values directly gives the wrong answer as
//! soon as the counter wraps between the two samples.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use thiserror::Error;

/// Raw timeout value meaning "wait forever", matching the OS convention.
pub const INFINITE_TIMEOUT: i32 = -1;

/// A source of wrapping 32-bit millisecond ticks.
pub trait TickSource {
    /// The current tick value.  Wraps to zero after `u32::MAX` milliseconds.
    fn now_ticks(&self) -> u32;
}

/// Production tick source: milliseconds since this value was created,
/// truncated to 32 bits so it wraps exactly like the OS uptime counter.
#[derive(Debug)]
pub struct StartupTicks {
    origin: Instant,
}

impl StartupTicks {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StartupTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for StartupTicks {
    fn now_ticks(&self) -> u32 {
        // The cast truncates to the low 32 bits, which is the wrap.
        self.origin.elapsed().as_millis() as u32
    }
}

/// Manually driven tick source for tests.
///
/// Tests place the counter anywhere (including just below the wrap point)
/// and advance it explicitly, making budget accounting deterministic.
#[derive(Debug)]
pub struct ManualTicks(AtomicU32);

impl ManualTicks {
    pub fn new(start: u32) -> Self {
        Self(AtomicU32::new(start))
    }

    /// Advances the counter, wrapping like the real one.
    pub fn advance(&self, ms: u32) {
        // fetch_add wraps on overflow, matching the OS counter.
        self.0.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TickSource for ManualTicks {
    fn now_ticks(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Wrapping elapsed ticks between two samples of the same source.
///
/// The only sanctioned way to compute elapsed time in the attempt loop.
pub fn elapsed_ticks(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}

/// The timeout budget for one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptTimeout {
    Infinite,
    Millis(u32),
}

/// A negative, non-infinite raw timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timeout must be non-negative or {INFINITE_TIMEOUT} (infinite), got {0}")]
pub struct InvalidTimeout(pub i32);

impl AttemptTimeout {
    /// Interprets a raw millisecond value: `-1` is infinite, other negative
    /// values are rejected, everything else is a finite budget.
    pub fn from_raw_millis(raw: i32) -> Result<Self, InvalidTimeout> {
        match raw {
            INFINITE_TIMEOUT => Ok(Self::Infinite),
            r if r < 0 => Err(InvalidTimeout(r)),
            r => Ok(Self::Millis(r as u32)),
        }
    }

    /// Whether `elapsed` ticks exhaust this budget.
    pub fn is_expired(self, elapsed: u32) -> bool {
        match self {
            Self::Infinite => false,
            Self::Millis(budget) => elapsed >= budget,
        }
    }

    /// The budget left after `elapsed` ticks.
    pub fn remaining(self, elapsed: u32) -> AttemptTimeout {
        match self {
            Self::Infinite => Self::Infinite,
            Self::Millis(budget) => Self::Millis(budget.saturating_sub(elapsed)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_ticks_without_wrap() {
        assert_eq!(elapsed_ticks(1_000, 1_250), 250);
        assert_eq!(elapsed_ticks(0, 0), 0);
    }

    #[test]
    fn test_elapsed_ticks_across_wrap() {
        // 10 ticks before the wrap, 20 ticks after: 30 elapsed, even though
        // `now < start` numerically.
        let start = u32::MAX - 9;
        let now = 20;
        assert_eq!(elapsed_ticks(start, now), 30);
    }

    #[test]
    fn test_manual_ticks_advance_wraps() {
        let ticks = ManualTicks::new(u32::MAX - 1);
        ticks.advance(3);
        assert_eq!(ticks.now_ticks(), 1);
    }

    #[test]
    fn test_startup_ticks_are_monotonic_within_the_window() {
        let source = StartupTicks::new();
        let a = source.now_ticks();
        let b = source.now_ticks();
        assert!(elapsed_ticks(a, b) < u32::MAX / 2, "samples taken back to back");
    }

    #[test]
    fn test_from_raw_millis_maps_minus_one_to_infinite() {
        assert_eq!(
            AttemptTimeout::from_raw_millis(INFINITE_TIMEOUT),
            Ok(AttemptTimeout::Infinite)
        );
    }

    #[test]
    fn test_from_raw_millis_rejects_other_negatives() {
        assert_eq!(AttemptTimeout::from_raw_millis(-2), Err(InvalidTimeout(-2)));
        assert_eq!(
            AttemptTimeout::from_raw_millis(i32::MIN),
            Err(InvalidTimeout(i32::MIN))
        );
    }

    #[test]
    fn test_from_raw_millis_accepts_zero_and_positive() {
        assert_eq!(AttemptTimeout::from_raw_millis(0), Ok(AttemptTimeout::Millis(0)));
        assert_eq!(
            AttemptTimeout::from_raw_millis(10_000),
            Ok(AttemptTimeout::Millis(10_000))
        );
    }

    #[test]
    fn test_infinite_budget_never_expires() {
        assert!(!AttemptTimeout::Infinite.is_expired(u32::MAX));
    }

    #[test]
    fn test_finite_budget_expires_at_exactly_its_value() {
        let budget = AttemptTimeout::Millis(100);
        assert!(!budget.is_expired(99));
        assert!(budget.is_expired(100));
        assert!(budget.is_expired(101));
    }

    #[test]
    fn test_remaining_subtracts_elapsed() {
        assert_eq!(
            AttemptTimeout::Millis(100).remaining(30),
            AttemptTimeout::Millis(70)
        );
        assert_eq!(AttemptTimeout::Infinite.remaining(30), AttemptTimeout::Infinite);
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        assert_eq!(
            AttemptTimeout::Millis(100).remaining(250),
            AttemptTimeout::Millis(0)
        );
    }
}
