//! HTTP handlers for job status queries.

use super::queue::JobQueue;
use super::types::{JobId, JobStatus};
use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub attempts: u32,
    pub created_at: u64,
}

pub async fn handle_get_job_status(
    Extension(queue): Extension<Arc<JobQueue>>,
    Path(job_id_str): Path<String>,
) -> (StatusCode, Json<Option<JobStatusResponse>>) {
    let job_id = JobId(job_id_str);

    match queue.get(&job_id) {
        Some(entry) => (
            StatusCode::OK,
            Json(Some(JobStatusResponse {
                job_id,
                status: entry.status,
                attempts: entry.attempts,
                created_at: entry.created_at,
            })),
        ),
        None => {
            tracing::debug!("Job not found: {}", job_id.0);
            (StatusCode::NOT_FOUND, Json(None))
        }
    }
}
