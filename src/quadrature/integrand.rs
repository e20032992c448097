//! Integrand evaluation strategies
//!
//! The function under the integral is injected configuration data rather
//! than compiled-in code: the scheduler only sees `evaluate(x)`. The
//! built-in functions cover the common benchmark shapes; library users can
//! supply any [`Integrand`] implementation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A real-valued function of one variable
///
/// Implementations must be pure: the schedule in which workers evaluate
/// subintervals is nondeterministic, and the final integral is only
/// reproducible when `evaluate` depends on nothing but `x`.
pub trait Integrand: Send + Sync {
    /// Evaluate `f(x)`
    fn evaluate(&self, x: f64) -> f64;

    /// Human-readable formula for reports
    fn describe(&self) -> String;
}

/// Built-in integrands selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinIntegrand {
    /// `|5x * cos(6x) * sin(x)| / 20`
    #[default]
    DampedOscillation,
    /// `x^2 / 200`
    HalfQuadratic,
    /// `x/4 + 4`
    LinearRamp,
    /// `|20 * cos(x)| / 4`
    RectifiedCosine,
}

impl Integrand for BuiltinIntegrand {
    fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::DampedOscillation => ((5.0 * x) * ((6.0 * x).cos() * x.sin())).abs() / 20.0,
            Self::HalfQuadratic => 0.005 * x.powi(2),
            Self::LinearRamp => 0.25 * x + 4.0,
            Self::RectifiedCosine => (20.0 * x.cos()).abs() / 4.0,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::DampedOscillation => "|5x * cos(6x) * sin(x)| / 20",
            Self::HalfQuadratic => "x^2 / 200",
            Self::LinearRamp => "x/4 + 4",
            Self::RectifiedCosine => "|20 * cos(x)| / 4",
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ramp() {
        let f = BuiltinIntegrand::LinearRamp;
        assert_eq!(f.evaluate(0.0), 4.0);
        assert_eq!(f.evaluate(4.0), 5.0);
    }

    #[test]
    fn test_half_quadratic() {
        let f = BuiltinIntegrand::HalfQuadratic;
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(10.0), 0.5);
    }

    #[test]
    fn test_rectified_outputs_nonnegative() {
        for f in [
            BuiltinIntegrand::DampedOscillation,
            BuiltinIntegrand::RectifiedCosine,
        ] {
            for i in -20..=20 {
                let x = i as f64 * 0.37;
                assert!(f.evaluate(x) >= 0.0, "{}: f({x}) < 0", f.describe());
            }
        }
    }

    #[test]
    fn test_default_is_damped_oscillation() {
        assert_eq!(BuiltinIntegrand::default(), BuiltinIntegrand::DampedOscillation);
    }
}
