//! Error types for the analysis pipeline.
//!
//! Every failure the pipeline can produce falls into one of five categories,
//! and the category decides what happens next: transient store faults are
//! retried with backoff, benign uniqueness races are swallowed as success,
//! caller mistakes surface immediately, and vanished entities are logged and
//! dropped.

use thiserror::Error;

/// Main error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Entity vanished before the operation ran (e.g. a paragraph deleted by
    /// the retention sweep while its aggregation job was still queued).
    /// Non-retryable: the work is moot, not broken.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transient storage fault (connection refused, pool timeout, disk
    /// contention). Eligible for retry with backoff.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A concurrent job raced us to the (paragraph_id, word) uniqueness
    /// check. The constraint guarantees no data was corrupted, so callers
    /// treat this as success.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Caller error (bad limit, word too short). Surfaced immediately,
    /// never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The dispatcher persisted a paragraph but failed to publish its
    /// aggregation job. Reported per unit so callers can resubmit only the
    /// orphaned text.
    #[error("queue publish failure: {0}")]
    QueuePublishFailure(String),
}

impl Error {
    /// Whether a job that failed with this error should be re-enqueued.
    ///
    /// Only transient store faults qualify; everything else either already
    /// succeeded in effect (`ConstraintViolation`) or will fail the same way
    /// again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for Error {
    /// Classifies low-level sqlx failures into the pipeline taxonomy.
    ///
    /// Unique-constraint violations become `ConstraintViolation` (the benign
    /// duplicate-aggregation race), missing rows become `NotFound`, and
    /// everything else is assumed transient.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::ConstraintViolation(db.to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Error::InvalidArgument(format!("unknown reference: {}", db))
            }
            other => Error::StoreUnavailable(other.to_string()),
        }
    }
}

/// Convenience Result type using the pipeline Error.
pub type Result<T> = std::result::Result<T, Error>;
