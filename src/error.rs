//! Error types
//!
//! Fatal errors surface through [`Error`]; per-subinterval precision
//! failures are ordinarily recoverable and travel in the run outcome
//! instead, unless strict mode promotes them to
//! [`Error::PrecisionUnreachable`] at the end of the run.

use crate::transport::NodeId;
use thiserror::Error;

/// Result type used throughout QuadPool
pub type Result<T> = std::result::Result<T, Error>;

/// All fatal error conditions QuadPool can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration (bad bounds, empty worker pool, zero depth
    /// guard). Raised before any task is seeded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A numeric command-line argument did not parse.
    #[error("invalid {what}: '{input}' is not a finite number")]
    Parse {
        /// Which argument was being parsed
        what: &'static str,
        /// The offending input text
        input: String,
    },

    /// The recursion guard tripped and strict mode is on. Without strict
    /// mode the same condition is reported per subinterval and the run
    /// completes normally.
    #[error(
        "requested precision unreachable on {failures} subinterval(s), deepest attempt at level {deepest}"
    )]
    PrecisionUnreachable {
        /// Number of subintervals that hit the guard
        failures: usize,
        /// Deepest bisection level reached
        deepest: u32,
    },

    /// A channel to or from a worker failed. Not locally recoverable; the
    /// run aborts naming the affected worker.
    #[error("channel failure at {node}: {reason}")]
    Channel {
        /// The worker on the broken end of the channel
        node: NodeId,
        /// What went wrong
        reason: String,
    },

    /// Filesystem failure while loading a config file or writing a report.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML configuration file did not parse.
    #[error("invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// A JSON report could not be encoded.
    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}
