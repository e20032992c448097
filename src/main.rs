//! QuadPool CLI entry point

use anyhow::{Context, Result};
use quadpool::config::{cli::Cli, cli_convert, validator, Config, DomainConfig};
use quadpool::coordinator;
use quadpool::output;
use quadpool::quadrature::Integrand;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = build_config_from_cli(&cli)?;
    validator::validate_config(&config).context("configuration validation failed")?;

    if !config.output.quiet {
        println!("QuadPool v{}", env!("CARGO_PKG_VERSION"));
        println!();
        print_configuration(&config);
        println!();
    }

    if cli.dry_run {
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let outcome = coordinator::run(&config)?;

    output::text::print_report(&outcome, &config);

    if let Some(path) = &config.output.json_output {
        output::json::write_report(path, &outcome, &config)
            .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
        if !config.output.quiet {
            println!("JSON report written to {}", path.display());
        }
    }

    Ok(())
}

/// Build configuration from CLI arguments
///
/// A config file, when given, supplies the base; explicit command-line
/// values override it.
fn build_config_from_cli(cli: &Cli) -> Result<Config> {
    let lower = cli
        .lower
        .as_deref()
        .map(|s| cli_convert::parse_bound("lower bound", s))
        .transpose()?;
    let upper = cli
        .upper
        .as_deref()
        .map(|s| cli_convert::parse_bound("upper bound", s))
        .transpose()?;
    let epsilon = cli
        .epsilon
        .as_deref()
        .map(|s| cli_convert::parse_bound("error threshold", s))
        .transpose()?;

    let mut config = match &cli.config {
        Some(path) => quadpool::config::toml::load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => {
            let (Some(lower), Some(upper), Some(epsilon)) = (lower, upper, epsilon) else {
                anyhow::bail!("missing arguments: pass <LOWER> <UPPER> <EPSILON> or --config");
            };
            Config::new(DomainConfig {
                lower,
                upper,
                epsilon,
            })
        }
    };

    if let Some(v) = lower {
        config.domain.lower = v;
    }
    if let Some(v) = upper {
        config.domain.upper = v;
    }
    if let Some(v) = epsilon {
        config.domain.epsilon = v;
    }
    if let Some(v) = cli.threads {
        config.workers.threads = v;
    }
    if let Some(v) = cli.integrand {
        config.integrand = v;
    }
    if let Some(v) = cli.max_depth {
        config.guard.max_depth = v;
    }
    if let Some(v) = cli.min_width {
        config.guard.min_width = v;
    }
    if cli.strict {
        config.guard.strict = true;
    }
    if let Some(path) = &cli.json {
        config.output.json_output = Some(path.clone());
    }
    if cli.show_leaves {
        config.output.show_leaves = true;
    }
    if cli.quiet {
        config.output.quiet = true;
    }

    Ok(config)
}

/// Print configuration summary
fn print_configuration(config: &Config) {
    println!("Configuration:");
    println!("  Domain:");
    println!(
        "    Bounds: [{}, {}]",
        config.domain.lower, config.domain.upper
    );
    println!("    Threshold: {}", config.domain.epsilon);
    println!("    Integrand: f(x) = {}", config.integrand.describe());
    println!("  Guard:");
    println!("    Max depth: {}", config.guard.max_depth);
    println!("    Min width: {}", config.guard.min_width);
    if config.guard.strict {
        println!("    Strict: enabled");
    }
    println!("  Workers:");
    println!("    Threads: {}", config.workers.threads);
}
