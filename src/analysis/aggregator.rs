//! The aggregation job body: tokenize one paragraph and persist its
//! per-word frequency rows.

use super::tokenizer::{tokenize, word_frequencies};
use super::types::{AggregateJobPayload, AggregationResult, AGGREGATE_HANDLER};
use crate::error::{Error, Result};
use crate::jobs::registry::JobHandlerRegistry;
use crate::jobs::types::Job;
use crate::store;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

/// Computes and persists word frequencies for a single paragraph.
///
/// Loads the paragraph (`NotFound` if it vanished before the job ran, a
/// legitimate race with the retention sweep, not a defect), tokenizes its
/// text, and writes one occurrence row per distinct word with
/// insert-if-absent semantics.
///
/// Running this twice for the same paragraph can never produce duplicate or
/// conflicting rows: existing rows are left untouched, and a concurrent job
/// racing the uniqueness check is treated as success. The contract is
/// transport-agnostic: behavior is identical whether a queue worker or a
/// direct caller invokes it.
pub async fn aggregate(pool: &Pool<Sqlite>, paragraph_id: Uuid) -> Result<AggregationResult> {
    let paragraph = store::paragraphs::get(pool, paragraph_id).await?;

    let tokens = tokenize(&paragraph.raw_text);
    let total_token_count = tokens.len();
    let frequencies = word_frequencies(&tokens);

    for (word, count) in &frequencies {
        match store::occurrences::insert_if_absent(pool, paragraph_id, word, *count).await {
            Ok(inserted) => {
                if !inserted {
                    tracing::debug!(
                        "Occurrence ({}, {}) already present, leaving it untouched",
                        paragraph_id,
                        word
                    );
                }
            }
            // A concurrent job won the insert between our conflict check and
            // the write. The constraint guarantees the row set is intact.
            Err(Error::ConstraintViolation(_)) => {
                tracing::debug!(
                    "Lost uniqueness race on ({}, {}), treating as success",
                    paragraph_id,
                    word
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Aggregated paragraph {}: {} unique words, {} tokens",
        paragraph_id,
        frequencies.len(),
        total_token_count
    );

    Ok(AggregationResult {
        paragraph_id,
        unique_word_count: frequencies.len(),
        total_token_count,
    })
}

/// Registers the aggregation job handler with the given registry.
///
/// The worker-facing boundary of the pipeline: parses the queued payload,
/// runs `aggregate`, and maps its outcome into the broker's retry taxonomy.
pub fn register_jobs(registry: &JobHandlerRegistry, pool: Pool<Sqlite>) {
    registry.register(AGGREGATE_HANDLER, move |job| {
        let pool = pool.clone();
        async move {
            let Job::Execute { payload, .. } = job;
            let payload: AggregateJobPayload = serde_json::from_value(payload)
                .map_err(|e| Error::InvalidArgument(format!("bad aggregation payload: {}", e)))?;
            job_outcome(aggregate(&pool, payload.paragraph_id).await)
        }
    });
}

/// Maps an aggregation result onto the job boundary.
///
/// A uniqueness-race loss means the rows already exist, which is success for
/// an idempotent job, so it must never mark the job failed.
pub(crate) fn job_outcome(result: Result<AggregationResult>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(Error::ConstraintViolation(_)) => Ok(()),
        Err(e) => Err(e),
    }
}
