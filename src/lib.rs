//! QuadPool - parallel adaptive quadrature
//!
//! QuadPool computes definite integrals with the adaptive trapezoid rule,
//! farming subintervals out to a pool of worker threads through a central
//! bag-of-tasks coordinator. Workers share no memory with the coordinator or
//! with each other; everything moves over point-to-point channels.
//!
//! # Architecture
//!
//! - **Quadrature oracle**: pure trapezoid estimators and the local
//!   accept/split test
//! - **Transport**: bidirectional channels keyed by a stable node id
//! - **Coordinator**: owns the task stack, the busy map, and the accepted
//!   leaf ledger; detects global completion
//! - **Workers**: stateless one-task-at-a-time evaluators
//! - **Stats and reports**: per-run counters, task latency histogram, text
//!   and JSON output

pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod quadrature;
pub mod stats;
pub mod transport;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use quadrature::{Integrand, Interval};
