//! Coordinator: the bag-of-tasks scheduler
//!
//! The coordinator exclusively owns all scheduling state: the LIFO task
//! stack, the busy map keyed by node id, the accepted leaf ledger, and the
//! run statistics. Every mutation happens inside one serial
//! receive-update-redispatch cycle, so no locking discipline is needed;
//! message passing replaces synchronization.
//!
//! Termination is the delicate part. The stack can be transiently empty
//! while workers are still computing children that will repopulate it, so
//! the exit predicate - stack empty AND every worker idle - is re-tested
//! after every redispatch and the loop never exits while any worker is
//! busy.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::quadrature::{Integrand, Interval};
use crate::stats::RunStats;
use crate::transport::protocol::{Command, Envelope, Reply, Task};
use crate::transport::{Hub, NodeId};
use crate::worker::pool::WorkerPool;
use crate::worker::WorkerContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An accepted partial result: one resolved subinterval and its estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// The resolved subinterval
    pub interval: Interval,
    /// Accepted trapezoid estimate
    pub value: f64,
}

/// A subinterval on which the recursion guard tripped before tolerance
/// was met
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionFailure {
    /// The offending subinterval
    pub interval: Interval,
    /// Best-effort coarse estimate folded into the total
    pub value: f64,
    /// Achieved |reference - approx|, still above tolerance
    pub delta: f64,
    /// Bisection level at which the guard tripped
    pub depth: u32,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The accumulated integral
    pub integral: f64,
    /// Accepted leaves in ascending order of lower bound; they tile the
    /// domain exactly
    pub leaves: Vec<Leaf>,
    /// Subintervals that hit the recursion guard (empty on a clean run)
    pub failures: Vec<PrecisionFailure>,
    /// Counters and timings for the run
    pub stats: RunStats,
}

#[derive(Debug, Clone, Copy, Default)]
struct WorkerSlot {
    busy: bool,
}

/// The scheduler itself
///
/// Workers are registered dynamically as their READY announcements arrive;
/// dispatching starts as soon as the first one shows up.
pub struct Coordinator {
    hub: Hub,
    queue: Vec<Task>,
    slots: HashMap<NodeId, WorkerSlot>,
    leaves: Vec<Leaf>,
    failures: Vec<PrecisionFailure>,
    stats: RunStats,
    stall_timeout: Duration,
}

impl Coordinator {
    /// Create a coordinator over a hub of connected (not yet ready) workers
    ///
    /// `stall_timeout` bounds how long the receive loop waits for any reply
    /// before declaring a peer lost.
    pub fn new(hub: Hub, stall_timeout: Duration) -> Self {
        Self {
            hub,
            queue: Vec::new(),
            slots: HashMap::new(),
            leaves: Vec::new(),
            failures: Vec::new(),
            stats: RunStats::new(),
            stall_timeout,
        }
    }

    /// Push the single task covering the whole domain
    pub fn seed(&mut self, domain: Interval) -> Result<()> {
        if self.hub.is_empty() {
            return Err(Error::Config(
                "worker pool is empty, need at least one worker".to_string(),
            ));
        }
        self.queue.push(Task::root(domain));
        Ok(())
    }

    /// Drive the run to completion and return what it produced
    pub fn run(&mut self) -> Result<RunOutcome> {
        let started = Instant::now();

        while !self.queue.is_empty() || self.any_busy() {
            let envelope = match self.hub.recv_timeout(self.stall_timeout) {
                Some(envelope) => envelope,
                None => return Err(self.stall_error()),
            };
            self.handle(envelope)?;
            self.dispatch()?;
        }

        self.shutdown()?;
        self.stats.set_elapsed(started.elapsed());

        // Fold the ledger in ascending bound order: the total is then
        // identical for any pool size and any reply interleaving.
        let mut leaves = std::mem::take(&mut self.leaves);
        leaves.sort_by(|a, b| a.interval.lower.total_cmp(&b.interval.lower));
        let integral = leaves.iter().map(|leaf| leaf.value).sum();

        Ok(RunOutcome {
            integral,
            leaves,
            failures: std::mem::take(&mut self.failures),
            stats: std::mem::take(&mut self.stats),
        })
    }

    /// Fold one reply into the scheduler state, marking the sender idle
    fn handle(&mut self, envelope: Envelope) -> Result<()> {
        let Envelope {
            from,
            elapsed_us,
            reply,
        } = envelope;

        match reply {
            Reply::Ready => {
                self.slots.insert(from, WorkerSlot::default());
                self.stats.register_worker(from);
            }
            Reply::Split { left, right } => {
                self.settle(from)?;
                self.stats.record_task_latency(elapsed_us);
                self.queue.push(left);
                self.queue.push(right);
                self.stats.record_split(from, left.depth);
            }
            Reply::Done { interval, value } => {
                self.settle(from)?;
                self.stats.record_task_latency(elapsed_us);
                self.leaves.push(Leaf { interval, value });
                self.stats.record_leaf(from);
            }
            Reply::Unresolved {
                interval,
                value,
                delta,
                depth,
            } => {
                self.settle(from)?;
                self.stats.record_task_latency(elapsed_us);
                // The best-effort value still enters the ledger so the
                // accepted leaves keep tiling the whole domain.
                self.leaves.push(Leaf { interval, value });
                self.failures.push(PrecisionFailure {
                    interval,
                    value,
                    delta,
                    depth,
                });
                self.stats.record_precision_failure(from, depth);
            }
        }

        Ok(())
    }

    /// Mark a worker idle after a work reply
    fn settle(&mut self, from: NodeId) -> Result<()> {
        let slot = self.slots.get_mut(&from).ok_or_else(|| Error::Channel {
            node: from,
            reason: "work reply from a worker that never announced ready".to_string(),
        })?;
        slot.busy = false;
        Ok(())
    }

    /// Hand the top of the stack to every idle worker
    fn dispatch(&mut self) -> Result<()> {
        for (&id, slot) in self.slots.iter_mut() {
            if slot.busy {
                continue;
            }
            let Some(task) = self.queue.pop() else {
                break;
            };
            self.hub.send(id, Command::Assign(task))?;
            slot.busy = true;
            self.stats.record_dispatch(id);
        }
        Ok(())
    }

    fn any_busy(&self) -> bool {
        self.slots.values().any(|slot| slot.busy)
    }

    /// Broadcast TERMINATE; called exactly once, after the exit predicate
    /// holds
    fn shutdown(&self) -> Result<()> {
        for id in self.hub.node_ids() {
            self.hub.send(id, Command::Terminate)?;
        }
        Ok(())
    }

    fn stall_error(&self) -> Error {
        let mut busy: Vec<NodeId> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.busy)
            .map(|(id, _)| *id)
            .collect();
        busy.sort();

        if let Some(&node) = busy.first() {
            let names: Vec<String> = busy.iter().map(|id| id.to_string()).collect();
            Error::Channel {
                node,
                reason: format!(
                    "no reply within {:.0?} with work in flight at {}",
                    self.stall_timeout,
                    names.join(", ")
                ),
            }
        } else {
            match self.hub.node_ids().first() {
                Some(&node) => Error::Channel {
                    node,
                    reason: "no worker announced ready".to_string(),
                },
                None => Error::Config("worker pool is empty".to_string()),
            }
        }
    }
}

/// Spawn a pool, integrate the configured domain, and tear everything down
pub fn run(config: &Config) -> Result<RunOutcome> {
    run_with_integrand(config, Arc::new(config.integrand))
}

/// Like [`run`], but with a caller-supplied integrand
pub fn run_with_integrand(config: &Config, integrand: Arc<dyn Integrand>) -> Result<RunOutcome> {
    let mut hub = Hub::new();
    let context = WorkerContext {
        integrand,
        epsilon: config.domain.epsilon,
        guard: config.guard,
    };
    let pool = WorkerPool::spawn(&mut hub, config.workers.threads, &context)?;

    let mut coordinator = Coordinator::new(
        hub,
        Duration::from_secs(config.workers.stall_timeout_secs),
    );
    coordinator.seed(config.domain.interval())?;

    match coordinator.run() {
        Ok(outcome) => {
            // The hub stays alive until the pool is reaped: a worker that
            // was still announcing itself when the run finished must be
            // able to deliver that envelope before it sees TERMINATE.
            pool.join()?;
            if config.guard.strict && !outcome.failures.is_empty() {
                return Err(Error::PrecisionUnreachable {
                    failures: outcome.failures.len(),
                    deepest: outcome.stats.deepest_level(),
                });
            }
            Ok(outcome)
        }
        Err(err) => {
            // Tear the channels down so stranded workers notice and exit,
            // then reap them; the original failure wins.
            drop(coordinator);
            let _ = pool.join();
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DomainConfig};
    use crate::quadrature::{
        coarse_estimate, reference_estimate, within_tolerance, BuiltinIntegrand,
    };

    struct Constant(f64);

    impl Integrand for Constant {
        fn evaluate(&self, _x: f64) -> f64 {
            self.0
        }

        fn describe(&self) -> String {
            format!("{}", self.0)
        }
    }

    fn test_config(lower: f64, upper: f64, epsilon: f64, threads: usize) -> Config {
        let mut config = Config::new(DomainConfig {
            lower,
            upper,
            epsilon,
        });
        config.workers.threads = threads;
        config
    }

    fn sequential_adaptive(f: &dyn Integrand, interval: Interval, epsilon: f64) -> f64 {
        let approx = coarse_estimate(f, interval);
        let reference = reference_estimate(f, interval);
        if within_tolerance(approx, reference, epsilon) {
            approx
        } else {
            let (left, right) = interval.split();
            sequential_adaptive(f, left, epsilon) + sequential_adaptive(f, right, epsilon)
        }
    }

    fn assert_tiles_domain(leaves: &[Leaf], lower: f64, upper: f64) {
        assert!(!leaves.is_empty());
        assert_eq!(leaves[0].interval.lower, lower);
        assert_eq!(leaves[leaves.len() - 1].interval.upper, upper);
        for pair in leaves.windows(2) {
            // Shared bisection points are computed once from the same
            // parent, so adjacency is exact, not approximate.
            assert_eq!(pair[0].interval.upper, pair[1].interval.lower);
        }
    }

    #[test]
    fn test_seed_requires_workers() {
        let hub = Hub::new();
        let mut coordinator = Coordinator::new(hub, Duration::from_secs(1));
        let err = coordinator.seed(Interval::new(0.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_constant_integrand_is_exact_with_zero_splits() {
        for threads in [1, 4] {
            let config = test_config(0.0, 2.0, 0.1, threads);
            let outcome = run_with_integrand(&config, Arc::new(Constant(3.0))).unwrap();

            assert!((outcome.integral - 6.0).abs() < 1e-12);
            assert_eq!(outcome.stats.splits(), 0);
            assert_eq!(outcome.stats.dispatched(), 1);
            assert_eq!(outcome.leaves.len(), 1);
            assert!(outcome.failures.is_empty());
        }
    }

    #[test]
    fn test_leaves_tile_the_domain() {
        let config = test_config(0.0, 1.0, 0.01, 3);
        let outcome = run(&config).unwrap();

        assert_tiles_domain(&outcome.leaves, 0.0, 1.0);
        assert_eq!(outcome.leaves.len() as u64, outcome.stats.leaves());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_result_independent_of_pool_size() {
        let single = run(&test_config(0.0, 2.0, 0.05, 1)).unwrap();
        let pooled = run(&test_config(0.0, 2.0, 0.05, 8)).unwrap();

        // The accept/split decision depends only on the interval, so both
        // runs produce the same leaf set and, with the ordered fold, the
        // same bits.
        assert_eq!(single.leaves.len(), pooled.leaves.len());
        assert_eq!(single.integral, pooled.integral);
    }

    #[test]
    fn test_smaller_epsilon_never_coarsens() {
        let loose = run(&test_config(0.0, 1.0, 0.1, 2)).unwrap();
        let tight = run(&test_config(0.0, 1.0, 0.02, 2)).unwrap();
        assert!(tight.leaves.len() >= loose.leaves.len());
    }

    #[test]
    fn test_matches_sequential_reference() {
        let config = test_config(0.0, 1.0, 0.1, 3);
        let outcome = run(&config).unwrap();

        let expected = sequential_adaptive(
            &BuiltinIntegrand::DampedOscillation,
            Interval::new(0.0, 1.0),
            0.1,
        );
        assert!((outcome.integral - expected).abs() <= 0.1);
        // Same leaf set, so the agreement is actually far tighter than the
        // accept threshold.
        assert!((outcome.integral - expected).abs() < 1e-6);
    }

    #[test]
    fn test_unreachable_precision_reports_instead_of_hanging() {
        let mut config = test_config(0.0, 1.0, 0.0, 2);
        config.guard.max_depth = 6;
        let outcome = run(&config).unwrap();

        assert!(!outcome.failures.is_empty());
        assert_eq!(
            outcome.failures.len() as u64,
            outcome.stats.precision_failures()
        );
        assert!(outcome.stats.deepest_level() <= 6);
        assert_tiles_domain(&outcome.leaves, 0.0, 1.0);
        for failure in &outcome.failures {
            assert!(failure.delta > 0.0);
        }
    }

    #[test]
    fn test_strict_mode_promotes_guard_trips() {
        let mut config = test_config(0.0, 1.0, 0.0, 2);
        config.guard.max_depth = 6;
        config.guard.strict = true;

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::PrecisionUnreachable { failures, .. } if failures > 0
        ));
    }

    #[test]
    fn test_min_width_guard_alone_terminates() {
        let mut config = test_config(0.0, 1.0, 0.0, 2);
        config.guard.max_depth = u32::MAX;
        config.guard.min_width = 0.02;
        let outcome = run(&config).unwrap();

        assert!(!outcome.failures.is_empty());
        for leaf in &outcome.leaves {
            assert!(leaf.interval.width() >= 0.005);
        }
    }

    #[test]
    fn test_silent_worker_pool_is_reported() {
        let mut hub = Hub::new();
        // Connected but no thread behind it: READY never arrives.
        let _endpoint = hub.connect();

        let mut coordinator = Coordinator::new(hub, Duration::from_millis(50));
        coordinator.seed(Interval::new(0.0, 1.0)).unwrap();

        match coordinator.run().unwrap_err() {
            Error::Channel { reason, .. } => assert!(reason.contains("announced")),
            other => panic!("expected channel error, got {other:?}"),
        }
    }

    #[test]
    fn test_lost_peer_is_named_mid_run() {
        let mut hub = Hub::new();
        let endpoint = hub.connect();
        let id = endpoint.id();

        // A worker that takes one assignment and dies without replying.
        let rogue = std::thread::spawn(move || {
            endpoint.send(Reply::Ready, Duration::ZERO).unwrap();
            let _ = endpoint.recv().unwrap();
        });

        let mut coordinator = Coordinator::new(hub, Duration::from_millis(100));
        coordinator.seed(Interval::new(0.0, 1.0)).unwrap();

        match coordinator.run().unwrap_err() {
            Error::Channel { node, reason } => {
                assert_eq!(node, id);
                assert!(reason.contains("in flight"));
            }
            other => panic!("expected channel error, got {other:?}"),
        }
        rogue.join().unwrap();
    }
}
