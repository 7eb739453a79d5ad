use super::work_stealing::build_pool;
use super::{Executor, InFlight, Job};
use crate::config::BackendKind;
use crate::error::EngineError;
use rayon::prelude::*;
use std::sync::Arc;

/// Rayon pool that runs each submitted batch as one parallel loop
pub struct DataParallel {
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
}

impl DataParallel {
    pub fn new(threads: usize) -> Result<Self, EngineError> {
        Ok(DataParallel {
            pool: build_pool(BackendKind::DataParallel, threads)?,
            in_flight: Arc::new(InFlight::default()),
        })
    }
}

impl Executor for DataParallel {
    fn kind(&self) -> BackendKind {
        BackendKind::DataParallel
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn execute(&self, job: Job) -> Result<(), EngineError> {
        self.execute_all(vec![job])
    }

    fn execute_all(&self, jobs: Vec<Job>) -> Result<(), EngineError> {
        self.in_flight.try_start()?;
        let in_flight = self.in_flight.clone();
        self.pool.spawn(move || {
            jobs.into_par_iter().for_each(|job| job());
            in_flight.finish();
        });
        Ok(())
    }

    fn shutdown(&self) {
        self.in_flight.close_and_wait();
    }
}
