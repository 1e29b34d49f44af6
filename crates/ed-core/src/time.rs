//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a non-negative real number of abstract time units
//! (minutes in the default configuration).  Service and arrival durations
//! are continuous samples, so an integer tick would force rounding into
//! every `hold`.
//!
//! `f64` is not `Ord`, which the wake queue needs for its keys.  `SimTime`
//! restores a total order with [`f64::total_cmp`]; constructors reject NaN
//! and negative values so the order coincides with numeric order for every
//! value that can actually occur.

use std::cmp::Ordering;
use std::fmt;

/// An absolute point on the simulated time line.
#[derive(Copy, Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Wrap `t`.
    ///
    /// # Panics
    /// Panics in debug mode if `t` is NaN or negative.
    #[inline]
    pub fn new(t: f64) -> SimTime {
        debug_assert!(t.is_finite() && t >= 0.0, "invalid simulation time {t}");
        SimTime(t.max(0.0))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// The time `duration` units after `self`.  Negative durations are
    /// clamped to zero so the clock never runs backwards.
    #[inline]
    pub fn after(self, duration: f64) -> SimTime {
        debug_assert!(!duration.is_nan(), "NaN duration");
        SimTime(self.0 + duration.max(0.0))
    }

    /// Units elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for SimTime {
    fn from(t: f64) -> Self {
        SimTime::new(t)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}
