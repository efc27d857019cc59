//! Worker Pool Implementation
//!
//! Manages the lifecycle of job execution. It spawns background workers that
//! continuously poll the `JobQueue` for eligible jobs.
//!
//! ## Responsibilities
//! - **Polling**: continuously checking for eligible jobs.
//! - **Lease Management**: Spawns a sidecar task to renew the job lease
//!   during long-running executions.
//! - **Execution**: Invoking the appropriate handler from the
//!   `JobHandlerRegistry` and finalizing the outcome (complete or retry).

use super::queue::JobQueue;
use super::registry::JobHandlerRegistry;
use super::types::*;
use std::sync::Arc;
use std::time::Duration;

/// The engine that drives job execution.
pub struct WorkerPool {
    /// Reference to the job queue (source of work).
    queue: Arc<JobQueue>,
    /// Registry containing the actual code for jobs.
    handlers: Arc<JobHandlerRegistry>,
    /// Number of concurrent workers.
    worker_count: usize,
}

impl WorkerPool {
    /// Creates a new WorkerPool.
    ///
    /// # Arguments
    /// * `worker_count`: Typically set to the number of CPU cores.
    pub fn new(
        queue: Arc<JobQueue>,
        handlers: Arc<JobHandlerRegistry>,
        worker_count: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue,
            handlers,
            worker_count,
        })
    }

    /// Spawns the workers and returns immediately.
    /// Each worker runs independently in an infinite loop.
    pub fn start(self: Arc<Self>) {
        tracing::info!("Starting {} job workers", self.worker_count);

        for worker_id in 0..self.worker_count {
            let pool = self.clone();
            tokio::spawn(async move {
                pool.worker_loop(worker_id).await;
            });
        }
    }

    /// The main loop for a single worker.
    ///
    /// 1. Fetches eligible jobs from the queue.
    /// 2. Attempts to "claim" one (atomic state change).
    /// 3. If claimed, executes the job while maintaining a liveness lease.
    ///
    /// Jobs carry no ordering guarantee: any worker may run any job, and a
    /// duplicate delivery of the same paragraph is tolerated by design.
    async fn worker_loop(&self, worker_id: usize) {
        tracing::info!("Worker {} started", worker_id);

        loop {
            let jobs = self.queue.eligible_jobs();

            if jobs.is_empty() {
                // Sleep if no work to avoid busy-waiting
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }

            let mut claimed = false;
            for (job_id, entry) in jobs {
                match self.queue.try_claim(&job_id) {
                    Ok(true) => {
                        tracing::info!(
                            "Worker {} claimed job {} (handler: {})",
                            worker_id,
                            job_id.0,
                            entry.job.handler_name()
                        );

                        self.execute_with_lease(&job_id, entry.job).await;

                        claimed = true;
                        break; // Refresh the eligible list
                    }
                    Ok(false) => {
                        tracing::trace!("Job {} already claimed by another worker", job_id.0);
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to claim job {}: {}", job_id.0, e);
                        continue;
                    }
                }
            }

            if !claimed {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }

    /// Wraps the actual execution with lease management.
    ///
    /// A sidecar task renews the lease every 10 seconds. If the worker
    /// panics or hangs, renewal stops and the lease eventually expires,
    /// making the job available again.
    async fn execute_with_lease(&self, job_id: &JobId, job: Job) {
        let renewal_handle = self.spawn_lease_renewal(job_id);

        let result = self.handlers.execute(&job).await;

        renewal_handle.abort();

        let outcome = match result {
            Ok(()) => self.queue.complete(job_id),
            Err(e) => self.queue.fail(job_id, &e),
        };

        if let Err(e) = outcome {
            tracing::error!("Failed to finalize job {}: {}", job_id.0, e);
        }
    }

    /// Spawns a background task to periodically renew the lease of a
    /// running job, so a long execution is not mistaken for a crash.
    fn spawn_lease_renewal(&self, job_id: &JobId) -> tokio::task::JoinHandle<()> {
        let queue = self.queue.clone();
        let job_id = job_id.clone();

        tokio::spawn(async move {
            loop {
                // Renew every 10s (lease duration is 30s)
                tokio::time::sleep(Duration::from_secs(10)).await;

                if !queue.renew_lease(&job_id) {
                    // Job finished or was reassigned
                    tracing::trace!("Job {} no longer needs lease renewal", job_id.0);
                    break;
                }
            }
        })
    }
}
