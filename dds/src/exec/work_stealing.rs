use super::{Executor, InFlight, Job};
use crate::config::BackendKind;
use crate::error::EngineError;
use std::sync::Arc;

/// Rayon thread pool; each job is spawned on it in submission order
pub struct WorkStealing {
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
}

impl WorkStealing {
    pub fn new(threads: usize) -> Result<Self, EngineError> {
        Ok(WorkStealing {
            pool: build_pool(BackendKind::WorkStealing, threads)?,
            in_flight: Arc::new(InFlight::default()),
        })
    }
}

/// A dedicated rayon pool; the global pool is never touched
pub(crate) fn build_pool(backend: BackendKind, threads: usize) -> Result<rayon::ThreadPool, EngineError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(move |i| format!("dds-{}-{}", backend, i))
        .build()
        .map_err(|e| EngineError::BackendInit {
            backend: backend.to_string(),
            reason: e.to_string(),
        })
}

impl Executor for WorkStealing {
    fn kind(&self) -> BackendKind {
        BackendKind::WorkStealing
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn execute(&self, job: Job) -> Result<(), EngineError> {
        self.in_flight.try_start()?;
        let in_flight = self.in_flight.clone();
        self.pool.spawn_fifo(move || {
            job();
            in_flight.finish();
        });
        Ok(())
    }

    fn shutdown(&self) {
        self.in_flight.close_and_wait();
    }
}
