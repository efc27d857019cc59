use serde::{Deserialize, Serialize};

/// Unique identifier for a job.
///
/// Wrapper around a UUID string; also the key under which the queue tracks
/// the job's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl JobId {
    /// Generates a new random UUID v4-based JobId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the lifecycle state of a job in the queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobStatus {
    /// Submitted (or scheduled for retry) but not yet picked up by a worker.
    Pending,
    /// Currently being processed under a lease.
    Running,
    /// Finished successfully.
    Completed,
    /// Failed with a non-retryable error; logged and discarded.
    Failed { error: String },
    /// Exhausted its retry budget without succeeding. Terminal, reported.
    DeadLettered { error: String },
}

/// The definition of a unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Job {
    /// A generic execution job.
    Execute {
        /// The name of the registered handler to invoke
        /// (e.g. "aggregate_paragraph").
        handler: String,
        /// Arbitrary JSON payload passed to the handler function.
        payload: serde_json::Value,
    },
}

impl Job {
    pub fn handler_name(&self) -> &str {
        match self {
            Job::Execute { handler, .. } => handler,
        }
    }
}

/// The internal representation of a job stored within the `JobQueue`.
///
/// Contains the job definition plus the mutable bookkeeping that drives
/// claiming, leasing, and retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    /// The actual work definition.
    pub job: Job,
    /// Current execution status.
    pub status: JobStatus,
    /// How many times a worker has claimed this job.
    pub attempts: u32,
    /// Timestamp (ms) when the job was submitted.
    pub created_at: u64,
    /// Earliest timestamp (ms) at which the job is eligible to run.
    /// Pushed into the future by the retry backoff.
    pub not_before: u64,
    /// Timestamp (ms) when the current execution lease expires.
    /// If `now > lease_expires`, the job is considered abandoned and can be
    /// reclaimed by another worker.
    pub lease_expires: Option<u64>,
    /// Timestamp (ms) when the job reached a terminal state. Drives the
    /// pruning of finished entries.
    pub finished_at: Option<u64>,
}

/// Bounds on the retry behavior of failed jobs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of claim attempts before a job is dead-lettered.
    pub max_attempts: u32,
    /// Backoff delay (ms) after the first failure.
    pub base_delay_ms: u64,
    /// Cap (ms) on the exponential backoff.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff with jitter for the given (1-based) attempt
    /// count. Jitter prevents a burst of failed jobs from all waking at the
    /// same instant.
    pub fn backoff_delay_ms(&self, attempts: u32) -> u64 {
        let exponent = attempts.saturating_sub(1).min(16);
        let delay = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);
        let jitter = rand::random::<u64>() % (self.base_delay_ms / 2 + 1);
        delay + jitter
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
