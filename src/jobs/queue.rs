//! Job Queue
//!
//! The shared store of job state and the broker half of the at-least-once
//! contract.
//!
//! ## Responsibilities
//! - **Submission**: Accepting jobs and tracking them as `Pending` entries.
//! - **Eligibility**: Deciding which jobs a worker may run next (pending past
//!   their backoff deadline, or running with an expired lease).
//! - **Leasing**: Managing job ownership and timeouts so a crashed worker's
//!   job is eventually redelivered.
//! - **Retry**: Rescheduling transient failures with bounded exponential
//!   backoff, and moving exhausted jobs to the dead-letter state.

use super::types::*;
use crate::error::{Error, Result};
use dashmap::DashMap;

/// How long a claimed job is owned before it is considered abandoned.
const LEASE_MS: u64 = 30_000;

/// The central component managing job state.
///
/// A `DashMap` keyed by job id; all transitions are made under the map's
/// per-entry lock, which is what makes `try_claim` atomic across workers.
pub struct JobQueue {
    jobs: DashMap<JobId, JobEntry>,
    policy: RetryPolicy,
}

impl JobQueue {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            jobs: DashMap::new(),
            policy,
        }
    }

    /// Publishes a job. This is the entry point for creating work.
    ///
    /// At-least-once: once this returns `Ok`, some worker will eventually see
    /// the job, possibly more than once (lease expiry re-delivers it).
    pub fn enqueue(&self, job: Job) -> Result<JobId> {
        let job_id = JobId::new();
        let now = now_ms();

        self.jobs.insert(
            job_id.clone(),
            JobEntry {
                job,
                status: JobStatus::Pending,
                attempts: 0,
                created_at: now,
                not_before: now,
                lease_expires: None,
                finished_at: None,
            },
        );

        tracing::debug!("Enqueued job {}", job_id.0);
        Ok(job_id)
    }

    /// Retrieves all jobs currently eligible for execution.
    ///
    /// Eligible jobs are:
    /// 1. Status is `Pending` and the backoff deadline has passed.
    /// 2. Status is `Running` BUT the lease has expired (worker crashed).
    pub fn eligible_jobs(&self) -> Vec<(JobId, JobEntry)> {
        let now = now_ms();
        let mut jobs = Vec::new();

        for entry in self.jobs.iter() {
            let available = match entry.status {
                JobStatus::Pending => now >= entry.not_before,
                JobStatus::Running => entry
                    .lease_expires
                    .map(|lease| now > lease)
                    .unwrap_or(false),
                _ => false,
            };

            if available {
                jobs.push((entry.key().clone(), entry.value().clone()));
            }
        }

        jobs
    }

    /// Attempts to lock an eligible job for execution by a worker.
    ///
    /// Sets the status to `Running` and establishes a **lease**. The lease
    /// acts as a heartbeat: if the worker crashes, the lease expires and the
    /// job becomes claimable again. Returns `Ok(false)` if another worker
    /// raced us to it.
    pub fn try_claim(&self, job_id: &JobId) -> Result<bool> {
        let now = now_ms();

        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            let claimable = match entry.status {
                JobStatus::Pending => now >= entry.not_before,
                // Reclaim of an abandoned job
                JobStatus::Running => entry
                    .lease_expires
                    .map(|lease| now > lease)
                    .unwrap_or(false),
                _ => false,
            };

            if !claimable {
                return Ok(false);
            }

            entry.status = JobStatus::Running;
            entry.attempts += 1;
            entry.lease_expires = Some(now + LEASE_MS);

            tracing::debug!("Claimed job {} (attempt {})", job_id.0, entry.attempts);
            return Ok(true);
        }

        Ok(false)
    }

    /// Extends the lease of a currently running job.
    /// Called periodically by the worker to prevent lease expiry during long
    /// executions. Returns `false` once the job no longer needs renewal.
    pub fn renew_lease(&self, job_id: &JobId) -> bool {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            if entry.status == JobStatus::Running {
                entry.lease_expires = Some(now_ms() + LEASE_MS);
                tracing::trace!("Renewed lease for job {}", job_id.0);
                return true;
            }
        }
        false
    }

    /// Marks a job as `Completed` and clears its lease.
    pub fn complete(&self, job_id: &JobId) -> Result<()> {
        let mut entry = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::NotFound(format!("job {}", job_id.0)))?;

        entry.status = JobStatus::Completed;
        entry.lease_expires = None;
        entry.finished_at = Some(now_ms());
        tracing::info!("Job {} completed", job_id.0);
        Ok(())
    }

    /// Records a failed execution and decides the job's fate.
    ///
    /// Retryable errors put the job back to `Pending` behind an exponential
    /// backoff deadline until the attempt budget runs out, after which the
    /// job is dead-lettered and reported. Non-retryable errors end the job as
    /// `Failed` immediately.
    pub fn fail(&self, job_id: &JobId, error: &Error) -> Result<()> {
        let mut entry = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::NotFound(format!("job {}", job_id.0)))?;

        entry.lease_expires = None;

        if !error.is_retryable() {
            tracing::warn!("Job {} failed permanently: {}", job_id.0, error);
            entry.status = JobStatus::Failed {
                error: error.to_string(),
            };
            entry.finished_at = Some(now_ms());
            return Ok(());
        }

        if entry.attempts >= self.policy.max_attempts {
            tracing::error!(
                "Job {} exhausted {} attempts, moving to dead letter: {}",
                job_id.0,
                entry.attempts,
                error
            );
            entry.status = JobStatus::DeadLettered {
                error: error.to_string(),
            };
            entry.finished_at = Some(now_ms());
            return Ok(());
        }

        let delay = self.policy.backoff_delay_ms(entry.attempts);
        entry.status = JobStatus::Pending;
        entry.not_before = now_ms() + delay;

        tracing::warn!(
            "Job {} failed transiently (attempt {}), retrying in {}ms: {}",
            job_id.0,
            entry.attempts,
            delay,
            error
        );
        Ok(())
    }

    /// Retrieves a job's current entry.
    pub fn get(&self, job_id: &JobId) -> Option<JobEntry> {
        self.jobs.get(job_id).map(|entry| entry.clone())
    }

    /// Removes `Completed` and `Failed` entries that finished more than
    /// `ttl_ms` ago, returning how many were dropped.
    ///
    /// Without this the map grows by one entry per job for the life of the
    /// process. Dead letters are exempt: they stay until someone looks at
    /// them.
    pub fn prune_finished(&self, ttl_ms: u64) -> usize {
        let cutoff = now_ms().saturating_sub(ttl_ms);
        let before = self.jobs.len();

        self.jobs.retain(|_, entry| {
            let prunable = matches!(
                entry.status,
                JobStatus::Completed | JobStatus::Failed { .. }
            );
            !(prunable && entry.finished_at.map(|at| at <= cutoff).unwrap_or(false))
        });

        let removed = before - self.jobs.len();
        if removed > 0 {
            tracing::debug!("Pruned {} finished job entries", removed);
        }
        removed
    }

    /// All dead-lettered jobs, for reporting. Terminal entries stay in the
    /// map so an exhausted job is never silently lost.
    pub fn dead_letters(&self) -> Vec<(JobId, JobEntry)> {
        self.jobs
            .iter()
            .filter(|entry| matches!(entry.status, JobStatus::DeadLettered { .. }))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Backdates a running job's lease so redelivery paths can be exercised
    /// without waiting out the real lease duration.
    #[cfg(test)]
    pub fn expire_lease_now(&self, job_id: &JobId) {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            entry.lease_expires = Some(now_ms().saturating_sub(1));
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn status_counts(&self) -> (usize, usize, usize, usize, usize) {
        let mut pending = 0;
        let mut running = 0;
        let mut completed = 0;
        let mut failed = 0;
        let mut dead = 0;

        for entry in self.jobs.iter() {
            match entry.status {
                JobStatus::Pending => pending += 1,
                JobStatus::Running => running += 1,
                JobStatus::Completed => completed += 1,
                JobStatus::Failed { .. } => failed += 1,
                JobStatus::DeadLettered { .. } => dead += 1,
            }
        }

        (pending, running, completed, failed, dead)
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
