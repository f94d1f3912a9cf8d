//! Worker pool for CPU heavy jobs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        mpsc::{channel, Receiver, Sender},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
};

use log::{error, warn};

use super::RuntimeError;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

type Job = Box<dyn FnOnce() + Send + 'static>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A fixed size pool of threads executing jobs in submission order.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WorkerPool {
    pub fn new(name: &str, num_threads: usize) -> Result<Self, RuntimeError> {
        if num_threads == 0 {
            return Err(RuntimeError::NoWorkers);
        }

        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(num_threads);
        for i in 0..num_threads {
            let thread_name = format!("{}_{}", name, i);
            let receiver = receiver.clone();
            let jh = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || worker_thread(receiver))
                .map_err(|e| RuntimeError::SpawnFailed(thread_name, e))?;
            workers.push(jh);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue a job for execution on the next free worker.
    pub fn execute<F>(&self, job: F) -> Result<(), RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        match self.sender {
            Some(ref s) => s
                .send(Box::new(job))
                .map_err(|_| RuntimeError::PoolShutDown),
            None => Err(RuntimeError::PoolShutDown),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Dropping the sender ends each worker once the queue is drained
        self.sender.take();

        for w in self.workers.drain(..) {
            if w.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn worker_thread(receiver: Arc<Mutex<Receiver<Job>>>) {
    loop {
        // Only hold the lock while waiting for the job, not while running it
        let job = {
            let rx = match receiver.lock() {
                Ok(r) => r,
                Err(_) => {
                    error!("Worker pool queue is poisoned, worker exiting");
                    return;
                }
            };

            match rx.recv() {
                Ok(j) => j,
                Err(_) => return,
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("Job panicked on worker thread {:?}", thread::current().name());
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
