//! Quadrature oracle
//!
//! Pure functions for the adaptive trapezoid method: a coarse single-panel
//! estimate, a fine composite reference estimate, and the local accept/split
//! test comparing the two. The scheduler calls these but never looks inside;
//! everything here is stateless and side-effect free.

pub mod integrand;

pub use integrand::{BuiltinIntegrand, Integrand};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of equal panels used by the reference estimator.
///
/// The reference estimate serves as local ground truth for the accept/split
/// decision; it is not a certified global error bound.
pub const REFERENCE_PANELS: usize = 1000;

/// A closed sub-region `[lower, upper]` of the integration domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound, `lower <= upper`
    pub upper: f64,
}

impl Interval {
    /// Create an interval from its bounds
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Midpoint `(lower + upper) / 2`
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Bisect into two halves sharing the midpoint
    ///
    /// The halves tile the interval exactly: their union is the parent and
    /// their intersection is the single shared midpoint.
    ///
    /// ```
    /// use quadpool::Interval;
    ///
    /// let (left, right) = Interval::new(0.0, 2.0).split();
    /// assert_eq!(left.upper, right.lower);
    /// assert_eq!(left.lower, 0.0);
    /// assert_eq!(right.upper, 2.0);
    /// ```
    pub fn split(&self) -> (Interval, Interval) {
        let mid = self.midpoint();
        (
            Interval::new(self.lower, mid),
            Interval::new(mid, self.upper),
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Single coarse trapezoid estimate over the whole interval
pub fn coarse_estimate(f: &dyn Integrand, interval: Interval) -> f64 {
    0.5 * interval.width() * (f.evaluate(interval.lower) + f.evaluate(interval.upper))
}

/// Fine composite trapezoid estimate over [`REFERENCE_PANELS`] equal panels
pub fn reference_estimate(f: &dyn Integrand, interval: Interval) -> f64 {
    let grid = interval.width() / REFERENCE_PANELS as f64;
    let mut sum = f.evaluate(interval.lower) + f.evaluate(interval.upper);
    for i in 1..REFERENCE_PANELS {
        sum += 2.0 * f.evaluate(interval.lower + i as f64 * grid);
    }
    (grid / 2.0) * sum
}

/// Local accept test: the coarse estimate agrees with the reference within
/// `epsilon`. Equality is accepted.
pub fn within_tolerance(approx: f64, reference: f64, epsilon: f64) -> bool {
    (reference - approx).abs() <= epsilon
}
