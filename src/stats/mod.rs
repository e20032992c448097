//! Run statistics
//!
//! Counters for one integration run: totals across the pool, per-worker
//! breakdowns keyed by node id, a task latency histogram, and the run's
//! wall time. Everything here is owned and mutated only by the coordinator
//! inside its serial message loop.

pub mod histogram;

pub use histogram::LatencyHistogram;

use crate::transport::NodeId;
use std::collections::HashMap;
use std::time::Duration;

/// Per-worker activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerCounters {
    /// Tasks dispatched to this worker
    pub dispatched: u64,
    /// Split replies received from it
    pub splits: u64,
    /// Accepted leaves it produced
    pub leaves: u64,
    /// Guard trips it reported
    pub precision_failures: u64,
}

/// Statistics for one integration run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    dispatched: u64,
    splits: u64,
    leaves: u64,
    precision_failures: u64,
    deepest_level: u32,
    per_worker: HashMap<NodeId, WorkerCounters>,
    task_latency: LatencyHistogram,
    elapsed: Option<Duration>,
}

impl RunStats {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a worker has a counter row (called when it announces ready)
    pub fn register_worker(&mut self, id: NodeId) {
        self.per_worker.entry(id).or_default();
    }

    /// Count one task handed to `id`
    pub fn record_dispatch(&mut self, id: NodeId) {
        self.dispatched += 1;
        self.per_worker.entry(id).or_default().dispatched += 1;
    }

    /// Count one split from `id`; `child_depth` is the depth of the two
    /// new tasks
    pub fn record_split(&mut self, id: NodeId, child_depth: u32) {
        self.splits += 1;
        self.per_worker.entry(id).or_default().splits += 1;
        self.deepest_level = self.deepest_level.max(child_depth);
    }

    /// Count one accepted leaf from `id`
    pub fn record_leaf(&mut self, id: NodeId) {
        self.leaves += 1;
        self.per_worker.entry(id).or_default().leaves += 1;
    }

    /// Count one guard trip from `id` at `depth`
    pub fn record_precision_failure(&mut self, id: NodeId, depth: u32) {
        self.precision_failures += 1;
        self.per_worker.entry(id).or_default().precision_failures += 1;
        self.deepest_level = self.deepest_level.max(depth);
    }

    /// Record one task's evaluation time
    pub fn record_task_latency(&mut self, micros: u64) {
        self.task_latency.record_micros(micros);
    }

    /// Set the run's wall time once the loop exits
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = Some(elapsed);
    }

    /// Total tasks dispatched
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Total splits
    pub fn splits(&self) -> u64 {
        self.splits
    }

    /// Total accepted leaves
    pub fn leaves(&self) -> u64 {
        self.leaves
    }

    /// Total guard trips
    pub fn precision_failures(&self) -> u64 {
        self.precision_failures
    }

    /// Deepest bisection level reached
    pub fn deepest_level(&self) -> u32 {
        self.deepest_level
    }

    /// Per-worker counters in ascending node order
    pub fn per_worker(&self) -> Vec<(NodeId, WorkerCounters)> {
        let mut rows: Vec<(NodeId, WorkerCounters)> =
            self.per_worker.iter().map(|(id, c)| (*id, *c)).collect();
        rows.sort_by_key(|(id, _)| *id);
        rows
    }

    /// Task evaluation latency histogram
    pub fn task_latency(&self) -> &LatencyHistogram {
        &self.task_latency
    }

    /// Wall time of the run, if it has finished
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}
