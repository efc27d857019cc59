//! Analysis Data Types
//!
//! The job payload that travels through the queue and the result an
//! aggregation run reports back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name under which the aggregation handler is registered with the job
/// handler registry.
pub const AGGREGATE_HANDLER: &str = "aggregate_paragraph";

/// The payload published to the job queue to trigger aggregation.
///
/// Only the paragraph id travels over the queue; workers reload the text
/// from the store, which keeps messages small and means a deleted paragraph
/// is detected at execution time rather than smuggled through stale payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateJobPayload {
    pub paragraph_id: Uuid,
}

/// Summary returned by a successful aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub paragraph_id: Uuid,
    /// Distinct words persisted for this paragraph.
    pub unique_word_count: usize,
    /// Length of the full token sequence (duplicates included).
    pub total_token_count: usize,
}
