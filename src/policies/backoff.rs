//! # Delay policy before relaunching an instance.
//!
//! [`BackoffPolicy`] computes how long a slot sleeps between the end of one
//! attempt and the start of the next. The delay for a streak of `n`
//! consecutive panics is `first × factor^n`, clamped to `max`, then jittered.
//! A normal return always uses the streak-zero delay.
//!
//! The default is a constant 100ms, which is what persistent workers expect:
//! a crashing instance comes back quickly but cannot spin the CPU.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use groupvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(1),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(3), Duration::from_millis(800));
//! assert_eq!(backoff.next(4), Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Restart delay policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay used after a normal return and after the first panic of a streak.
    pub first: Duration,
    /// Upper bound for the computed delay (applied before jitter).
    pub max: Duration,
    /// Multiplicative growth per consecutive panic (`1.0` = constant).
    pub factor: f64,
    /// Randomization applied to the clamped delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 100ms delay, capped at 30s, no jitter.
    fn default() -> Self {
        Self::constant(Duration::from_millis(100))
    }
}

impl BackoffPolicy {
    /// A fixed delay with no growth and no jitter.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay.max(Duration::from_secs(30)),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay for the given streak (0-indexed).
    ///
    /// Values that are not a representable `Duration` (NaN, negative, too
    /// large) collapse to `max`, as does anything above it. Never panics.
    pub fn next(&self, streak: u32) -> Duration {
        let exp = streak.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max)
            .min(self.max);
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(first_ms: u64, max_ms: u64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn default_is_constant_100ms() {
        let p = BackoffPolicy::default();
        for streak in [0, 1, 5, 50] {
            assert_eq!(p.next(streak), Duration::from_millis(100));
        }
    }

    #[test]
    fn huge_delays_saturate_instead_of_panicking() {
        assert_eq!(BackoffPolicy::constant(Duration::MAX).next(0), Duration::MAX);

        let near_max = BackoffPolicy::constant(Duration::from_secs(u64::MAX));
        assert_eq!(near_max.next(0), Duration::from_secs(u64::MAX));
        assert_eq!(near_max.next(u32::MAX), Duration::from_secs(u64::MAX));

        let mut growing = exp(100, 1_000);
        growing.factor = f64::INFINITY;
        assert_eq!(growing.next(3), Duration::from_secs(1));
        growing.factor = f64::NAN;
        assert_eq!(growing.next(3), Duration::from_secs(1));
    }

    #[test]
    fn grows_then_clamps() {
        let p = exp(100, 1_000);
        assert_eq!(p.next(0), Duration::from_millis(100));
        assert_eq!(p.next(1), Duration::from_millis(200));
        assert_eq!(p.next(2), Duration::from_millis(400));
        assert_eq!(p.next(4), Duration::from_millis(1_000));
    }

    #[test]
    fn first_above_max_is_clamped() {
        assert_eq!(exp(5_000, 1_000).next(0), Duration::from_millis(1_000));
    }

    #[test]
    fn overflowing_streak_clamps_to_max() {
        assert_eq!(exp(100, 10_000).next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn constant_keeps_delay_even_above_default_cap() {
        let p = BackoffPolicy::constant(Duration::from_secs(45));
        assert_eq!(p.next(3), Duration::from_secs(45));
    }

    #[test]
    fn equal_jitter_stays_within_half_and_full() {
        let p = BackoffPolicy {
            jitter: JitterPolicy::Equal,
            ..BackoffPolicy::constant(Duration::from_millis(1_000))
        };
        for streak in 0..50 {
            let d = p.next(streak);
            assert!(d >= Duration::from_millis(500), "{d:?}");
            assert!(d <= Duration::from_millis(1_000), "{d:?}");
        }
    }
}
