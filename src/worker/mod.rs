//! Worker implementation
//!
//! A worker is stateless across tasks: it blocks on its command channel,
//! resolves one task at a time against the quadrature oracle, and replies
//! with either an accepted value, an atomic two-child split, or an
//! unresolved report when the recursion guard trips. Workers never talk to
//! each other and keep no memory of prior work.

pub mod pool;

use crate::config::GuardConfig;
use crate::quadrature::{coarse_estimate, reference_estimate, within_tolerance, Integrand};
use crate::transport::protocol::{Command, Reply, Task};
use crate::transport::Endpoint;
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable per-run evaluation context shared by every worker
///
/// The error threshold is process-wide and fixed for a run, so it travels
/// here once instead of inside every task message.
#[derive(Clone)]
pub struct WorkerContext {
    /// The function under the integral
    pub integrand: Arc<dyn Integrand>,
    /// Local accept/split threshold
    pub epsilon: f64,
    /// Recursion guard limits
    pub guard: GuardConfig,
}

impl WorkerContext {
    /// Resolve one task into its reply
    ///
    /// Accept when the coarse estimate agrees with the reference within
    /// `epsilon`. Otherwise bisect, unless the guard would be exceeded, in
    /// which case the coarse estimate is reported unresolved so the run
    /// terminates instead of recursing forever.
    pub fn resolve(&self, task: Task) -> Reply {
        let approx = coarse_estimate(self.integrand.as_ref(), task.interval);
        let reference = reference_estimate(self.integrand.as_ref(), task.interval);

        if within_tolerance(approx, reference, self.epsilon) {
            return Reply::Done {
                interval: task.interval,
                value: approx,
            };
        }

        let child_width = task.interval.width() / 2.0;
        if task.depth >= self.guard.max_depth || child_width < self.guard.min_width {
            return Reply::Unresolved {
                interval: task.interval,
                value: approx,
                delta: (reference - approx).abs(),
                depth: task.depth,
            };
        }

        let (left, right) = task.interval.split();
        Reply::Split {
            left: Task {
                interval: left,
                depth: task.depth + 1,
            },
            right: Task {
                interval: right,
                depth: task.depth + 1,
            },
        }
    }
}

/// One worker bound to its transport endpoint
pub struct Worker {
    endpoint: Endpoint,
    context: WorkerContext,
}

impl Worker {
    /// Create a worker from its endpoint and the shared run context
    pub fn new(endpoint: Endpoint, context: WorkerContext) -> Self {
        Self { endpoint, context }
    }

    /// Announce readiness, then serve assignments until told to terminate
    pub fn serve(self) -> Result<()> {
        self.endpoint.send(Reply::Ready, Duration::ZERO)?;

        loop {
            match self.endpoint.recv()? {
                Command::Terminate => return Ok(()),
                Command::Assign(task) => {
                    let started = Instant::now();
                    let reply = self.context.resolve(task);
                    self.endpoint.send(reply, started.elapsed())?;
                }
            }
        }
    }
}
