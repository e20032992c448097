//! Task latency histogram using HdrHistogram
//!
//! Tracks per-task evaluation wall time with bounded memory and O(1)
//! recording. Tasks are short (a few thousand integrand evaluations), so
//! the range runs from 1 microsecond to 10 minutes at 3 significant
//! digits.

use hdrhistogram::Histogram;
use std::time::Duration;

const MIN_US: u64 = 1;
const MAX_US: u64 = 600_000_000;

/// Latency histogram wrapper
///
/// # Example
///
/// ```
/// use quadpool::stats::histogram::LatencyHistogram;
/// use std::time::Duration;
///
/// let mut hist = LatencyHistogram::new();
/// hist.record(Duration::from_micros(120));
/// hist.record(Duration::from_micros(250));
///
/// assert_eq!(hist.len(), 2);
/// assert!(hist.percentile(50.0).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create an empty histogram covering 1us to 10 minutes
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(MIN_US, MAX_US, 3)
            .expect("histogram bounds are statically valid");
        Self { histogram }
    }

    /// Record one task's evaluation time, clamped to the tracked range
    #[inline]
    pub fn record(&mut self, elapsed: Duration) {
        let micros = (elapsed.as_micros() as u64).clamp(MIN_US, MAX_US);
        let _ = self.histogram.record(micros);
    }

    /// Record a raw microsecond sample, clamped to the tracked range
    #[inline]
    pub fn record_micros(&mut self, micros: u64) {
        let _ = self.histogram.record(micros.clamp(MIN_US, MAX_US));
    }

    /// Value at a percentile (0.0 - 100.0), `None` when empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_micros(
            self.histogram.value_at_percentile(percentile),
        ))
    }

    /// Minimum recorded latency, `None` when empty
    pub fn min(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_micros(self.histogram.min()))
    }

    /// Maximum recorded latency, `None` when empty
    pub fn max(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_micros(self.histogram.max()))
    }

    /// Mean latency, `None` when empty
    pub fn mean(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_micros(self.histogram.mean() as u64))
    }

    /// Number of recorded samples
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// True when no sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}
