use super::{lock, Executor, Job};
use crate::config::BackendKind;
use crate::error::EngineError;
use log::warn;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Default)]
struct State {
    queue: VecDeque<Job>,
    running: usize,
    closed: bool,
}

struct Shared {
    state: Mutex<State>,
    limit: usize,
}

impl Shared {
    /// Body of a spawned task thread: run queued jobs until none are left
    fn drain(&self) {
        loop {
            let job = {
                let mut state = lock(&self.state);
                match state.queue.pop_front() {
                    Some(job) => job,
                    None => {
                        state.running -= 1;
                        return;
                    }
                }
            };
            job();
        }
    }
}

/// Spawns named OS threads for submitted jobs. At most `threads` of them
/// exist at once; jobs arriving while all are busy wait in a queue and are
/// picked up by the next thread to finish its job.
pub struct ThreadPerTask {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    next_id: AtomicUsize,
}

impl ThreadPerTask {
    pub fn new(threads: usize) -> Self {
        ThreadPerTask {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                limit: threads.max(1),
            }),
            handles: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    fn live_threads(&self) -> usize {
        lock(&self.handles).iter().filter(|handle| !handle.is_finished()).count()
    }
}

impl Executor for ThreadPerTask {
    fn kind(&self) -> BackendKind {
        BackendKind::ThreadPerTask
    }

    fn threads(&self) -> usize {
        self.shared.limit
    }

    fn execute(&self, job: Job) -> Result<(), EngineError> {
        let mut handles = lock(&self.handles);
        {
            let mut state = lock(&self.shared.state);
            if state.closed {
                return Err(EngineError::ShutDown);
            }
            state.queue.push_back(job);
            if state.running >= self.shared.limit {
                return Ok(());
            }
            state.running += 1;
        }
        handles.retain(|handle| !handle.is_finished());

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let shared = self.shared.clone();
        match thread::Builder::new()
            .name(format!("dds-task-{id}"))
            .spawn(move || shared.drain())
        {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                let mut state = lock(&self.shared.state);
                state.running -= 1;
                if state.running == 0 {
                    // Nothing left to run the queue; dropped jobs report as rejected
                    warn!("could not spawn a task thread, dropping {} queued jobs: {e}", state.queue.len());
                    state.queue.clear();
                } else {
                    warn!("could not spawn a task thread, queueing the job: {e}");
                }
            }
        }
        Ok(())
    }

    fn shutdown(&self) {
        let handles = {
            let mut handles = lock(&self.handles);
            lock(&self.shared.state).closed = true;
            std::mem::take(&mut *handles)
        };
        for handle in handles {
            let _ = handle.join();
        }
    }
}
