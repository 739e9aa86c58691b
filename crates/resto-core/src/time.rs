//! Virtual time.
//!
//! # Design
//!
//! Time is a real-valued, monotonically non-decreasing `SimTime`.  It has no
//! relation to wall-clock time; the unit is whatever the configuration uses
//! (the restaurant models use minutes).
//!
//! `f64` is not `Ord`, so `SimTime` orders with [`f64::total_cmp`].  The event
//! queue rejects NaN and negative delays at insertion, so in practice only
//! finite values and `+∞` (a timer that never fires) ever appear.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

/// An absolute point in virtual time.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// A time that is never reached.
    pub const NEVER: SimTime = SimTime(f64::INFINITY);

    /// Validate that `t` is usable as a time value (not NaN, not negative).
    pub fn new(t: f64) -> CoreResult<SimTime> {
        if t.is_nan() || t < 0.0 {
            return Err(CoreError::InvalidTime(t));
        }
        // `+ 0.0` folds -0.0 into 0.0 so it does not sort before ZERO.
        Ok(SimTime(t + 0.0))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Return the time `delay` units after `self`.
    #[inline]
    pub fn offset(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }

    /// Duration elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl std::hash::Hash for SimTime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // total_cmp equality is bitwise equality
        self.0.to_bits().hash(state);
    }
}

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

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}
