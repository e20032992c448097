//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::quadrature::{BuiltinIntegrand, Interval};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub domain: DomainConfig,
    #[serde(default)]
    pub integrand: BuiltinIntegrand,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Configuration for `domain` with defaults everywhere else
    pub fn new(domain: DomainConfig) -> Self {
        Self {
            domain,
            integrand: BuiltinIntegrand::default(),
            guard: GuardConfig::default(),
            workers: WorkerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// The integration domain and local error threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Lower integration bound
    pub lower: f64,
    /// Upper integration bound
    pub upper: f64,
    /// Accept/split threshold for the local tolerance test
    pub epsilon: f64,
}

impl DomainConfig {
    /// The domain as an interval
    pub fn interval(&self) -> Interval {
        Interval::new(self.lower, self.upper)
    }
}

/// Recursion guard limits
///
/// Pathological integrands or a zero threshold would otherwise bisect
/// forever; subintervals that hit either limit are reported unresolved
/// instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Deepest bisection level a task may reach
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Narrowest subinterval that may still be split
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    /// Treat guard trips as a fatal error at the end of the run
    #[serde(default)]
    pub strict: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            min_width: default_min_width(),
            strict: false,
        }
    }
}

fn default_max_depth() -> u32 {
    40
}

fn default_min_width() -> f64 {
    1e-12
}

/// Worker pool configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Seconds the coordinator waits for any reply before declaring a
    /// peer lost
    #[serde(default = "default_stall_timeout")]
    pub stall_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            stall_timeout_secs: default_stall_timeout(),
        }
    }
}

fn default_threads() -> usize {
    // One execution unit stays with the coordinator.
    num_cpus::get().saturating_sub(1).max(1)
}

fn default_stall_timeout() -> u64 {
    30
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report path
    pub json_output: Option<PathBuf>,
    /// Include accepted leaf intervals in reports
    #[serde(default)]
    pub show_leaves: bool,
    /// Suppress the configuration summary
    #[serde(default)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_defaults() {
        let config = Config::new(DomainConfig {
            lower: 0.0,
            upper: 1.0,
            epsilon: 0.1,
        });

        assert_eq!(config.guard.max_depth, 40);
        assert!(config.workers.threads >= 1);
        assert!(!config.guard.strict);
        assert!(config.output.json_output.is_none());
    }

    #[test]
    fn test_domain_interval() {
        let domain = DomainConfig {
            lower: -1.0,
            upper: 3.0,
            epsilon: 0.5,
        };
        assert_eq!(domain.interval(), Interval::new(-1.0, 3.0));
    }
}
