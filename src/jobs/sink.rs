//! Transport-agnostic job submission.
//!
//! The dispatcher publishes through a `JobSink` and never learns whether the
//! job went onto the queue or ran inline in the calling task. The two
//! transports are interchangeable because the aggregation contract itself is
//! idempotent and transport-agnostic.

use super::queue::JobQueue;
use super::registry::JobHandlerRegistry;
use super::types::{Job, JobId};
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A destination that accepts published jobs.
///
/// `submit` is fire-and-forget from the caller's perspective: success means
/// the job was accepted for (eventual or immediate) execution, not that it
/// completed.
pub trait JobSink: Send + Sync {
    fn submit(&self, job: Job) -> Pin<Box<dyn Future<Output = Result<JobId>> + Send + '_>>;
}

impl JobSink for JobQueue {
    fn submit(&self, job: Job) -> Pin<Box<dyn Future<Output = Result<JobId>> + Send + '_>> {
        Box::pin(async move { self.enqueue(job) })
    }
}

/// Runs each submitted job immediately in the calling task.
///
/// The synchronous counterpart to queueing: useful for tests and for small
/// deployments that have no worker pool. The handler sees exactly the same
/// job it would have received from a worker.
pub struct InlineSink {
    registry: Arc<JobHandlerRegistry>,
}

impl InlineSink {
    pub fn new(registry: Arc<JobHandlerRegistry>) -> Self {
        Self { registry }
    }
}

impl JobSink for InlineSink {
    fn submit(&self, job: Job) -> Pin<Box<dyn Future<Output = Result<JobId>> + Send + '_>> {
        Box::pin(async move {
            self.registry.execute(&job).await?;
            Ok(JobId::new())
        })
    }
}
