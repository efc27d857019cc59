//! HTTP handler for the submission endpoint.

use super::dispatcher::dispatch;
use super::types::{SubmitRequest, SubmitResponse};
use crate::error::Error;
use crate::jobs::sink::JobSink;
use axum::{http::StatusCode, Extension, Json};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

pub async fn handle_submit_paragraphs(
    Extension(pool): Extension<Pool<Sqlite>>,
    Extension(sink): Extension<Arc<dyn JobSink>>,
    Json(req): Json<SubmitRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    match dispatch(
        &pool,
        sink.as_ref(),
        &req.submitter_id,
        &req.submitter_name,
        &req.raw_text,
    )
    .await
    {
        Ok(report) => {
            let created = report.paragraph_ids.len();
            let status = if report.fully_queued() {
                "success"
            } else {
                "partial"
            };
            (
                StatusCode::CREATED,
                Json(SubmitResponse {
                    status: status.to_string(),
                    message: format!("Saved and queued {} paragraphs", created),
                    paragraphs_created: created,
                    paragraph_ids: report.paragraph_ids,
                    units: report.units,
                }),
            )
        }
        Err(e) => {
            let code = match e {
                Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!("Submission rejected: {}", e);
            (
                code,
                Json(SubmitResponse {
                    status: "error".to_string(),
                    message: e.to_string(),
                    paragraphs_created: 0,
                    paragraph_ids: vec![],
                    units: vec![],
                }),
            )
        }
    }
}
