//! Execution backends and the context that owns one.
//!
//! A backend runs boxed jobs on its threads. [`ExecutionContext`] wraps the
//! selected backend, turns task closures into jobs that report through a
//! [`TaskHandle`], and shuts the backend down when the last clone is dropped.

mod data_parallel;
mod thread_per_task;
mod work_stealing;
mod worker_pool;

pub use data_parallel::DataParallel;
pub use thread_per_task::ThreadPerTask;
pub use work_stealing::WorkStealing;
pub use worker_pool::WorkerPool;

use crate::config::{BackendKind, EngineConfig};
use crate::error::{EngineError, SolveError};
use crossbeam_channel::{bounded, Receiver};
use log::{debug, error};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Unit of work handed to a backend
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread backend. Every accepted job runs exactly once, also when the
/// backend is shut down after accepting it.
pub trait Executor: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn threads(&self) -> usize;

    fn execute(&self, job: Job) -> Result<(), EngineError>;

    /// Run a group of jobs. Backends that parallelize whole batches override
    /// this.
    fn execute_all(&self, jobs: Vec<Job>) -> Result<(), EngineError> {
        for job in jobs {
            self.execute(job)?;
        }
        Ok(())
    }

    /// Refuse new jobs and wait for the accepted ones to finish
    fn shutdown(&self);
}

/// Cooperative cancellation flag shared between a handle and its task
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of one submitted task. Dropping the handle before the task has
/// finished abandons it.
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T, SolveError>>,
    cancel: CancelToken,
    done: bool,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run
    pub fn wait(mut self) -> Result<T, SolveError> {
        self.done = true;
        // The job drops its sender without sending only when it never ran
        self.receiver.recv().unwrap_or(Err(SolveError::Rejected))
    }

    pub fn is_finished(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Ask the task to stop. A task that has not started is skipped.
    pub fn abandon(self) {
        drop(self);
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        if !self.done {
            self.cancel.cancel();
        }
    }
}

/// Counts jobs accepted but not yet finished, for backends that cannot
/// join their threads. Closing and accepting share one lock, so no job is
/// accepted after [`InFlight::close_and_wait`] has started waiting.
#[derive(Default)]
pub(crate) struct InFlight {
    state: Mutex<InFlightState>,
    idle: Condvar,
}

#[derive(Default)]
struct InFlightState {
    count: usize,
    closed: bool,
}

impl InFlight {
    pub(crate) fn try_start(&self) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        if state.closed {
            return Err(EngineError::ShutDown);
        }
        state.count += 1;
        Ok(())
    }

    pub(crate) fn finish(&self) {
        let mut state = lock(&self.state);
        state.count = state.count.saturating_sub(1);
        if state.count == 0 {
            self.idle.notify_all();
        }
    }

    /// Refuse further jobs and wait for the accepted ones
    pub(crate) fn close_and_wait(&self) {
        let mut state = lock(&self.state);
        state.closed = true;
        while state.count > 0 {
            state = self.idle.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Jobs never panic while holding one of our locks, so a poisoned lock still
/// guards consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

struct Inner {
    executor: Box<dyn Executor>,
    config: EngineConfig,
    closed: AtomicBool,
}

impl Inner {
    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("shutting down {} backend", self.executor.kind());
            self.executor.shutdown();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Owner of a thread backend. Clones share the backend; it is shut down on
/// [`ExecutionContext::shutdown`] or when the last clone is dropped.
#[derive(Clone)]
pub struct ExecutionContext {
    inner: Arc<Inner>,
}

impl ExecutionContext {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let threads = config.actual_threads();
        let executor: Box<dyn Executor> = match config.backend {
            BackendKind::ThreadPerTask => Box::new(ThreadPerTask::new(threads)),
            BackendKind::WorkerPool => Box::new(WorkerPool::new(threads)?),
            BackendKind::WorkStealing => Box::new(WorkStealing::new(threads)?),
            BackendKind::DataParallel => Box::new(DataParallel::new(threads)?),
        };
        debug!("started {} backend with {} threads", config.backend, threads);
        Ok(ExecutionContext {
            inner: Arc::new(Inner {
                executor,
                config,
                closed: AtomicBool::new(false),
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> BackendKind {
        self.inner.executor.kind()
    }

    pub fn threads(&self) -> usize {
        self.inner.executor.threads()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Run `task` on the backend
    pub fn submit<T, F>(&self, task: F) -> Result<TaskHandle<T>, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<T, SolveError> + Send + 'static,
    {
        let (job, handle) = self.prepare(task)?;
        self.inner.executor.execute(job)?;
        Ok(handle)
    }

    /// Run a group of tasks; handles come back in the order of `tasks`
    pub fn submit_all<T, F>(&self, tasks: Vec<F>) -> Result<Vec<TaskHandle<T>>, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<T, SolveError> + Send + 'static,
    {
        let mut jobs = Vec::with_capacity(tasks.len());
        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let (job, handle) = self.prepare(task)?;
            jobs.push(job);
            handles.push(handle);
        }
        self.inner.executor.execute_all(jobs)?;
        Ok(handles)
    }

    /// Refuse new tasks and wait for the accepted ones
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    fn prepare<T, F>(&self, task: F) -> Result<(Job, TaskHandle<T>), EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<T, SolveError> + Send + 'static,
    {
        if self.is_shut_down() {
            return Err(EngineError::ShutDown);
        }
        let (sender, receiver) = bounded(1);
        let cancel = CancelToken::new();
        let task_cancel = cancel.clone();
        let job: Job = Box::new(move || {
            if task_cancel.is_cancelled() {
                return;
            }
            let result = match panic::catch_unwind(AssertUnwindSafe(|| task(&task_cancel))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!("solver task panicked: {message}");
                    Err(SolveError::TaskPanicked(message))
                }
            };
            // The handle may be gone already
            let _ = sender.send(result);
        });
        let handle = TaskHandle {
            receiver,
            cancel,
            done: false,
        };
        Ok((job, handle))
    }
}
