//! Row types for the durable store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to the external identity provider's user.
///
/// The core never authenticates; it only stores the reference and joins it
/// back in for ranked search output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submitter {
    pub id: String,
    pub display_name: String,
}

/// One paragraph unit, created once by the dispatcher when a submission is
/// split. Immutable thereafter; deleted only by the retention sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: Uuid,
    pub submitter_id: String,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

/// One logical row per distinct (paragraph, word) pair.
///
/// The count is fixed at creation and never incremented by repeated
/// aggregation runs; paragraph text is immutable, so the first write is
/// already the true count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordOccurrence {
    pub paragraph_id: Uuid,
    pub word: String,
    pub count: i64,
}

/// One joined row from the ranked-retrieval query: an occurrence together
/// with its owning paragraph and that paragraph's submitter.
#[derive(Debug, Clone)]
pub struct RankedRow {
    pub paragraph_id: Uuid,
    pub submitter_name: String,
    pub raw_text: String,
    pub count: i64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate totals read by the daily statistics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTotals {
    pub paragraph_count: i64,
    pub occurrence_rows: i64,
    pub distinct_words: i64,
    pub total_tokens: i64,
}
