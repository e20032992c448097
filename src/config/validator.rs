//! Configuration validation

use super::{Config, DomainConfig, GuardConfig, WorkerConfig};
use crate::error::{Error, Result};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_domain(&config.domain)?;
    validate_guard(&config.guard)?;
    validate_workers(&config.workers)?;
    Ok(())
}

/// Validate the integration domain
pub fn validate_domain(domain: &DomainConfig) -> Result<()> {
    if !domain.lower.is_finite() || !domain.upper.is_finite() {
        return Err(Error::Config(format!(
            "bounds must be finite, got [{}, {}]",
            domain.lower, domain.upper
        )));
    }

    if domain.lower > domain.upper {
        return Err(Error::Config(format!(
            "lower bound {} exceeds upper bound {}",
            domain.lower, domain.upper
        )));
    }

    if !domain.epsilon.is_finite() || domain.epsilon < 0.0 {
        return Err(Error::Config(format!(
            "error threshold must be a non-negative finite number, got {}",
            domain.epsilon
        )));
    }

    Ok(())
}

/// Validate the recursion guard
pub fn validate_guard(guard: &GuardConfig) -> Result<()> {
    if guard.max_depth == 0 {
        return Err(Error::Config(
            "max_depth must be at least 1".to_string(),
        ));
    }

    if !guard.min_width.is_finite() || guard.min_width < 0.0 {
        return Err(Error::Config(format!(
            "min_width must be a non-negative finite number, got {}",
            guard.min_width
        )));
    }

    Ok(())
}

/// Validate the worker pool
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    if workers.threads == 0 {
        return Err(Error::Config(
            "worker pool needs at least 1 thread (2 or more execution units including the coordinator)"
                .to_string(),
        ));
    }

    if workers.stall_timeout_secs == 0 {
        return Err(Error::Config(
            "stall_timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}
