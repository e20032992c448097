//! JSON report output
//!
//! Serializes the run outcome for downstream tooling: configuration echo,
//! integral, counters, latency percentiles, precision failures, and the
//! leaf list when requested.

use crate::config::Config;
use crate::coordinator::{Leaf, PrecisionFailure, RunOutcome};
use crate::error::Result;
use crate::quadrature::Integrand;
use crate::stats::LatencyHistogram;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and a human-readable form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration_human(d),
        }
    }
}

/// Latency summary with percentiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLatency {
    pub min: JsonDuration,
    pub mean: JsonDuration,
    pub max: JsonDuration,
    pub p50: JsonDuration,
    pub p90: JsonDuration,
    pub p99: JsonDuration,
}

impl JsonLatency {
    fn from_histogram(hist: &LatencyHistogram) -> Option<Self> {
        if hist.is_empty() {
            return None;
        }
        Some(Self {
            min: JsonDuration::from_duration(hist.min().unwrap_or_default()),
            mean: JsonDuration::from_duration(hist.mean().unwrap_or_default()),
            max: JsonDuration::from_duration(hist.max().unwrap_or_default()),
            p50: JsonDuration::from_duration(hist.percentile(50.0).unwrap_or_default()),
            p90: JsonDuration::from_duration(hist.percentile(90.0).unwrap_or_default()),
            p99: JsonDuration::from_duration(hist.percentile(99.0).unwrap_or_default()),
        })
    }
}

/// Scheduler counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTaskSummary {
    pub dispatched: u64,
    pub splits: u64,
    pub leaves: u64,
    pub precision_failures: u64,
    pub deepest_level: u32,
}

/// Per-worker counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWorker {
    pub node: String,
    pub dispatched: u64,
    pub splits: u64,
    pub leaves: u64,
    pub precision_failures: u64,
}

/// The complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub timestamp: String,
    pub integrand: String,
    pub lower: f64,
    pub upper: f64,
    pub epsilon: f64,
    pub integral: f64,
    pub elapsed: JsonDuration,
    pub tasks: JsonTaskSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_latency: Option<JsonLatency>,
    pub workers: Vec<JsonWorker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub precision_failures: Vec<PrecisionFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves: Option<Vec<Leaf>>,
}

impl JsonReport {
    /// Assemble a report from a finished run
    pub fn build(outcome: &RunOutcome, config: &Config) -> Self {
        let stats = &outcome.stats;

        let workers = stats
            .per_worker()
            .into_iter()
            .map(|(id, counters)| JsonWorker {
                node: id.to_string(),
                dispatched: counters.dispatched,
                splits: counters.splits,
                leaves: counters.leaves,
                precision_failures: counters.precision_failures,
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            integrand: config.integrand.describe(),
            lower: config.domain.lower,
            upper: config.domain.upper,
            epsilon: config.domain.epsilon,
            integral: outcome.integral,
            elapsed: JsonDuration::from_duration(stats.elapsed().unwrap_or_default()),
            tasks: JsonTaskSummary {
                dispatched: stats.dispatched(),
                splits: stats.splits(),
                leaves: stats.leaves(),
                precision_failures: stats.precision_failures(),
                deepest_level: stats.deepest_level(),
            },
            task_latency: JsonLatency::from_histogram(stats.task_latency()),
            workers,
            precision_failures: outcome.failures.clone(),
            leaves: config.output.show_leaves.then(|| outcome.leaves.clone()),
        }
    }
}

/// Write the report for a finished run to `path`
pub fn write_report(path: &Path, outcome: &RunOutcome, config: &Config) -> Result<()> {
    let report = JsonReport::build(outcome, config);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &report)?;
    Ok(())
}

fn format_duration_human(d: Duration) -> String {
    let micros = d.as_micros();
    if micros >= 1_000_000 {
        format!("{:.3}s", d.as_secs_f64())
    } else if micros >= 1_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{micros}us")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DomainConfig};
    use crate::coordinator;

    fn small_run() -> (RunOutcome, Config) {
        let mut config = Config::new(DomainConfig {
            lower: 0.0,
            upper: 1.0,
            epsilon: 0.05,
        });
        config.workers.threads = 2;
        let outcome = coordinator::run(&config).unwrap();
        (outcome, config)
    }

    #[test]
    fn test_written_report_parses_back() {
        let (outcome, mut config) = small_run();
        config.output.show_leaves = true;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&path, &outcome, &config).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let report: JsonReport = serde_json::from_str(&content).unwrap();

        assert_eq!(report.lower, 0.0);
        assert_eq!(report.upper, 1.0);
        assert_eq!(report.integral, outcome.integral);
        assert_eq!(report.tasks.leaves, outcome.leaves.len() as u64);
        assert!(!report.workers.is_empty());
        assert_eq!(report.leaves.unwrap().len(), outcome.leaves.len());
    }

    #[test]
    fn test_leaves_omitted_unless_requested() {
        let (outcome, config) = small_run();
        let report = JsonReport::build(&outcome, &config);
        assert!(report.leaves.is_none());

        let encoded = serde_json::to_string(&report).unwrap();
        assert!(!encoded.contains("\"leaves\""));
    }

    #[test]
    fn test_format_duration_human() {
        assert_eq!(format_duration_human(Duration::from_micros(250)), "250us");
        assert_eq!(format_duration_human(Duration::from_micros(2_500)), "2.50ms");
        assert_eq!(format_duration_human(Duration::from_secs(2)), "2.000s");
    }
}
