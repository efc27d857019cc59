//! Splitting a submission into paragraph units and launching their
//! aggregation jobs.

use super::types::{DispatchReport, UnitOutcome, UnitStatus};
use crate::analysis::types::{AggregateJobPayload, AGGREGATE_HANDLER};
use crate::error::{Error, Result};
use crate::jobs::sink::JobSink;
use crate::jobs::types::Job;
use crate::store;
use regex::Regex;
use sqlx::{Pool, Sqlite};

/// Splits raw text into paragraph units.
///
/// Units are separated by runs of two or more consecutive blank lines
/// (three or more newlines in a row); a single blank line stays inside its
/// unit. Each unit is trimmed of leading/trailing whitespace, and units that
/// become empty are discarded. Split order is preserved.
pub fn split_units(raw_text: &str) -> Vec<String> {
    let re = Regex::new(r"\n{3,}").unwrap();
    re.split(raw_text)
        .map(|unit| unit.trim())
        .filter(|unit| !unit.is_empty())
        .map(|unit| unit.to_string())
        .collect()
}

/// Persists each paragraph unit of a submission and publishes one
/// aggregation job per unit.
///
/// The submitter reference arrives pre-validated from the identity
/// collaborator, so it is recorded (or refreshed) here before any paragraph
/// row points at it.
///
/// Sequential per submission to preserve split order; independent
/// submissions proceed fully in parallel. Never blocks on job completion.
///
/// A persist failure aborts the dispatch (the store is down; nothing later
/// would succeed either). A publish failure after a successful persist does
/// NOT abort: the unit is reported as orphaned and the remaining units
/// proceed, so the caller can resubmit only the failed text.
pub async fn dispatch(
    pool: &Pool<Sqlite>,
    sink: &dyn JobSink,
    submitter_id: &str,
    submitter_name: &str,
    raw_text: &str,
) -> Result<DispatchReport> {
    let units = split_units(raw_text);

    if units.is_empty() {
        return Err(Error::InvalidArgument(
            "submission contains no non-empty paragraph units".to_string(),
        ));
    }

    store::submitters::upsert(pool, submitter_id, submitter_name).await?;

    let mut paragraph_ids = Vec::with_capacity(units.len());
    let mut outcomes = Vec::with_capacity(units.len());

    for unit in &units {
        let paragraph = store::paragraphs::insert(pool, submitter_id, unit).await?;
        paragraph_ids.push(paragraph.id);

        let job = Job::Execute {
            handler: AGGREGATE_HANDLER.to_string(),
            payload: serde_json::to_value(AggregateJobPayload {
                paragraph_id: paragraph.id,
            })
            .map_err(|e| Error::QueuePublishFailure(e.to_string()))?,
        };

        match sink.submit(job).await {
            Ok(job_id) => {
                tracing::debug!(
                    "Paragraph {} queued for aggregation (job {})",
                    paragraph.id,
                    job_id.0
                );
                outcomes.push(UnitOutcome {
                    paragraph_id: paragraph.id,
                    status: UnitStatus::Queued,
                    error: None,
                });
            }
            Err(e) => {
                tracing::error!(
                    "Paragraph {} persisted but its job publish failed: {}",
                    paragraph.id,
                    e
                );
                outcomes.push(UnitOutcome {
                    paragraph_id: paragraph.id,
                    status: UnitStatus::Orphaned,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(DispatchReport {
        paragraph_ids,
        units: outcomes,
    })
}
