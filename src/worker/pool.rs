//! Spawning and joining the worker threads

use crate::worker::{
    thread_name, CancelOnPanic, Consumer, ItemGenerator, Pacing, Producer, Role, WorkerConfig,
    WorkerContext, WorkerError, WorkerReport, WorkerResult,
};
use std::thread::{self, JoinHandle};

struct Worker {
    name: String,
    handle: JoinHandle<WorkerResult<WorkerReport>>,
}

/// All producer and consumer threads of one run
///
/// Worker ids start at 1 within each role. Threads are named
/// `producer-N` and `consumer-N`.
pub struct WorkerPool {
    context: WorkerContext,
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Start `config.producers` producers and `config.consumers` consumers
    ///
    /// If a thread cannot be started the token is triggered, the threads
    /// already running are joined, and the spawn failure is returned.
    pub fn spawn(config: &WorkerConfig, context: WorkerContext) -> WorkerResult<Self> {
        let mut pool = Self {
            context,
            workers: Vec::with_capacity(config.producers + config.consumers),
        };

        let roles = (1..=config.producers)
            .map(|id| (Role::Producer, id))
            .chain((1..=config.consumers).map(|id| (Role::Consumer, id)));

        for (role, id) in roles {
            if let Err(e) = pool.start(config, role, id) {
                log::error!("Could not start {} {}: {}", role, id, e);
                pool.context.token().trigger();
                let _ = pool.join();
                return Err(WorkerError::Spawn {
                    role,
                    id,
                    message: e.to_string(),
                });
            }
        }

        log::info!(
            "Started {} producer(s) and {} consumer(s)",
            config.producers,
            config.consumers
        );
        Ok(pool)
    }

    fn start(&mut self, config: &WorkerConfig, role: Role, id: usize) -> std::io::Result<()> {
        let name = thread_name(role, id);
        let context = self.context.clone();
        let seed = config.seed_for(role, id);
        let detection = config.block_detection;

        let body: Box<dyn FnOnce() -> WorkerResult<WorkerReport> + Send> = match role {
            Role::Producer => {
                let generator = match seed {
                    Some(seed) => ItemGenerator::with_seed(id, seed),
                    None => ItemGenerator::new(id),
                };
                let pacing = Pacing::new(config.producer_max_wait, seed);
                Box::new(move || Producer::new(id, context, generator, pacing, detection).run())
            }
            Role::Consumer => {
                let pacing = Pacing::new(config.consumer_max_wait, seed);
                Box::new(move || Consumer::new(id, context, pacing, detection).run())
            }
        };

        let token = self.context.token().clone();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            let _guard = CancelOnPanic(token.clone());
            let result = body();
            if result.is_err() {
                token.trigger();
            }
            result
        })?;

        self.workers.push(Worker { name, handle });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker to finish
    ///
    /// Returns every report, or the first failure after all threads have
    /// been joined. Only returns once all threads have exited, so the
    /// queue outlives every worker.
    pub fn join(self) -> WorkerResult<Vec<WorkerReport>> {
        let mut reports = Vec::with_capacity(self.workers.len());
        let mut first_error = None;

        for worker in self.workers {
            match worker.handle.join() {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(e)) => {
                    log::error!("Worker {} failed: {}", worker.name, e);
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    log::error!("Worker {} panicked", worker.name);
                    first_error.get_or_insert(WorkerError::Panicked { name: worker.name });
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}
