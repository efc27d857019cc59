//! Dispatch Data Types
//!
//! Request/response DTOs for the submission endpoint and the per-unit
//! outcome report returned by the dispatcher.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fate of a single paragraph unit within one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Persisted and its aggregation job accepted.
    Queued,
    /// Persisted, but publishing its aggregation job failed. The paragraph
    /// exists yet will never be aggregated unless resubmitted.
    Orphaned,
}

/// Per-unit outcome, in split order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub paragraph_id: Uuid,
    pub status: UnitStatus,
    /// Publish error detail for orphaned units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a dispatch call hands back to the submission caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Ids of all created paragraphs, preserving split order. Orphaned units
    /// are included: their rows exist.
    pub paragraph_ids: Vec<Uuid>,
    pub units: Vec<UnitOutcome>,
}

impl DispatchReport {
    pub fn fully_queued(&self) -> bool {
        self.units
            .iter()
            .all(|unit| unit.status == UnitStatus::Queued)
    }
}

/// Body of `POST /paragraphs`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub submitter_id: String,
    /// Display name carried alongside the pre-validated reference; recorded
    /// so ranked search can label results without calling back out.
    pub submitter_name: String,
    pub raw_text: String,
}

/// Response of `POST /paragraphs`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: String,
    pub message: String,
    pub paragraphs_created: usize,
    pub paragraph_ids: Vec<Uuid>,
    pub units: Vec<UnitOutcome>,
}
