//! Worker pool thread management
//!
//! Spawns one OS thread per worker, each owning its transport endpoint, and
//! joins them after shutdown so worker panics and channel failures surface
//! instead of disappearing.

use crate::error::{Error, Result};
use crate::transport::{Hub, NodeId};
use crate::worker::{Worker, WorkerContext};
use std::thread::JoinHandle;

/// Handles for a pool of spawned workers
pub struct WorkerPool {
    handles: Vec<(NodeId, JoinHandle<Result<()>>)>,
}

impl WorkerPool {
    /// Connect `threads` workers to the hub and start their serve loops
    pub fn spawn(hub: &mut Hub, threads: usize, context: &WorkerContext) -> Result<Self> {
        let mut handles = Vec::with_capacity(threads);

        for _ in 0..threads {
            let endpoint = hub.connect();
            let id = endpoint.id();
            let worker = Worker::new(endpoint, context.clone());
            let handle = std::thread::Builder::new()
                .name(id.to_string())
                .spawn(move || worker.serve())?;
            handles.push((id, handle));
        }

        Ok(Self { handles })
    }

    /// Number of workers in the pool
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when the pool holds no workers
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to exit and surface the first failure
    pub fn join(self) -> Result<()> {
        for (id, handle) in self.handles {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(Error::Channel {
                        node: id,
                        reason: "worker thread panicked".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;
    use crate::quadrature::BuiltinIntegrand;
    use crate::transport::protocol::{Command, Reply};
    use std::sync::Arc;
    use std::time::Duration;

    fn context() -> WorkerContext {
        WorkerContext {
            integrand: Arc::new(BuiltinIntegrand::LinearRamp),
            epsilon: 0.5,
            guard: GuardConfig::default(),
        }
    }

    #[test]
    fn test_spawned_workers_announce_ready() {
        let mut hub = Hub::new();
        let pool = WorkerPool::spawn(&mut hub, 3, &context()).unwrap();
        assert_eq!(pool.len(), 3);

        let mut ready = Vec::new();
        for _ in 0..3 {
            let envelope = hub.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(envelope.reply, Reply::Ready);
            ready.push(envelope.from);
        }
        ready.sort();
        assert_eq!(ready, hub.node_ids());

        for id in hub.node_ids() {
            hub.send(id, Command::Terminate).unwrap();
        }
        pool.join().unwrap();
    }

    #[test]
    fn test_join_surfaces_orphaned_workers() {
        let mut hub = Hub::new();
        let pool = WorkerPool::spawn(&mut hub, 1, &context()).unwrap();

        // Dropping the hub closes every channel; the worker's serve loop
        // must exit with a channel error rather than block forever.
        drop(hub);
        assert!(matches!(pool.join(), Err(Error::Channel { .. })));
    }
}
