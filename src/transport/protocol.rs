//! Message protocol between coordinator and workers
//!
//! # Message Flow
//!
//! ```text
//! Coordinator                     Worker
//!     |                              |
//!     |<-------- READY --------------|
//!     |                              |
//!     |-------- ASSIGN(task) ------->|
//!     |                              |
//!     |<-- SPLIT(left, right) -------|   (one atomic message)
//!     |        or                    |
//!     |<-- DONE(interval, value) ----|
//!     |        or                    |
//!     |<-- UNRESOLVED(...) ----------|   (recursion guard tripped)
//!     |                              |
//!     |-------- TERMINATE ---------->|
//! ```
//!
//! A split always travels as a single message carrying both children, so no
//! reply from another worker can ever land between the two legs of a split.

use crate::quadrature::Interval;
use crate::transport::NodeId;
use serde::{Deserialize, Serialize};

/// One unit of dispatchable work
///
/// The error threshold is fixed for the whole run and lives in the worker
/// context, so tasks carry only the interval and their bisection depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The subinterval to estimate
    pub interval: Interval,
    /// Bisection level, 0 for the whole domain
    pub depth: u32,
}

impl Task {
    /// The initial task covering the whole integration domain
    pub fn root(domain: Interval) -> Self {
        Self {
            interval: domain,
            depth: 0,
        }
    }
}

/// Coordinator-to-worker commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Dispatch one task
    Assign(Task),
    /// Shut the worker down cleanly
    Terminate,
}

/// Worker-to-coordinator replies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Sent once at startup: the worker exists and is idle
    Ready,
    /// The task's estimate missed tolerance; both children in one message
    Split {
        /// Lower half of the parent interval
        left: Task,
        /// Upper half of the parent interval
        right: Task,
    },
    /// The task's coarse estimate was accepted
    Done {
        /// The resolved subinterval
        interval: Interval,
        /// Accepted trapezoid estimate
        value: f64,
    },
    /// The recursion guard tripped before tolerance was met; the coarse
    /// estimate is reported as a best effort
    Unresolved {
        /// The offending subinterval
        interval: Interval,
        /// Best-effort coarse estimate
        value: f64,
        /// Achieved |reference - approx|, still above tolerance
        delta: f64,
        /// Bisection level at which the guard tripped
        depth: u32,
    },
}

/// A reply wrapped with its sender and the task's evaluation wall time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sending worker
    pub from: NodeId,
    /// Time spent evaluating the task, microseconds (0 for READY)
    pub elapsed_us: u64,
    /// The reply itself
    pub reply: Reply,
}
