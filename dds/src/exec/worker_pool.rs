use super::{lock, Executor, Job};
use crate::config::BackendKind;
use crate::error::EngineError;
use crossbeam_channel::{unbounded, Sender};
use log::trace;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// Fixed set of worker threads taking jobs from a shared queue
pub struct WorkerPool {
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, EngineError> {
        let threads = threads.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(threads);
        for id in 0..threads {
            let receiver = receiver.clone();
            let worker = thread::Builder::new()
                .name(format!("dds-worker-{id}"))
                .spawn(move || {
                    // Runs until the queue is closed and drained
                    for job in receiver.iter() {
                        job();
                    }
                    trace!("worker {id} exiting");
                })
                .map_err(|e| EngineError::BackendInit {
                    backend: BackendKind::WorkerPool.to_string(),
                    reason: e.to_string(),
                })?;
            workers.push(worker);
        }
        Ok(WorkerPool {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            threads,
        })
    }
}

impl Executor for WorkerPool {
    fn kind(&self) -> BackendKind {
        BackendKind::WorkerPool
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn execute(&self, job: Job) -> Result<(), EngineError> {
        match lock(&self.sender).as_ref() {
            Some(sender) => sender.send(job).map_err(|_| EngineError::ShutDown),
            None => Err(EngineError::ShutDown),
        }
    }

    fn shutdown(&self) {
        lock(&self.sender).take();
        let workers = std::mem::take(&mut *lock(&self.workers));
        for worker in workers {
            let _ = worker.join();
        }
    }
}
