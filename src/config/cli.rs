//! CLI argument parsing using clap

use crate::quadrature::BuiltinIntegrand;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

/// QuadPool - parallel adaptive quadrature
#[derive(Parser, Debug)]
#[command(name = "quadpool")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lower integration bound
    #[arg(value_name = "LOWER", required_unless_present = "config")]
    pub lower: Option<String>,

    /// Upper integration bound
    #[arg(value_name = "UPPER", required_unless_present = "config")]
    pub upper: Option<String>,

    /// Local error threshold for the accept/split test
    #[arg(value_name = "EPSILON", required_unless_present = "config")]
    pub epsilon: Option<String>,

    /// TOML configuration file (command-line flags win on conflict)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // === Pool Options ===
    /// Number of worker threads (default: available cores minus one)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    // === Integrand Options ===
    /// Function to integrate
    #[arg(long, value_enum)]
    pub integrand: Option<BuiltinIntegrand>,

    // === Guard Options ===
    /// Deepest bisection level before a subinterval is reported unresolved
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Narrowest subinterval that may still be split
    #[arg(long)]
    pub min_width: Option<f64>,

    /// Fail the run if any subinterval cannot reach the threshold
    #[arg(long)]
    pub strict: bool,

    // === Output Options ===
    /// JSON report output path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Include accepted leaf intervals in reports
    #[arg(long)]
    pub show_leaves: bool,

    /// Suppress the configuration summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Validate the configuration and exit without integrating
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse arguments, exiting with code 1 on a usage error
    pub fn parse_args() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => {
                let _ = err.print();
                std::process::exit(1);
            }
        }
    }
}
