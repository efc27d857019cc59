use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ranked hit: a paragraph containing the queried word, with its
/// submitter's display name and the stored occurrence count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub paragraph_id: Uuid,
    pub submitter_name: String,
    /// Leading slice of the paragraph text (capped at 500 chars).
    pub raw_text: String,
    pub word_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub word: String,
    pub results_count: usize,
    pub results: Vec<RankedResult>,
}
