//! Scheduled Maintenance
//!
//! Two independent housekeeping triggers that reuse the pipeline's store
//! primitives and add no new state of their own:
//! - **Retention sweep**: deletes paragraphs older than the configured
//!   window; their word occurrences go with them via the cascade.
//! - **Statistics snapshot**: reads aggregate totals from the occurrence
//!   table and logs them.

use crate::error::Result;
use crate::jobs::queue::JobQueue;
use crate::store;
use crate::store::types::SnapshotTotals;
use axum::{http::StatusCode, Extension, Json};
use chrono::{Duration as ChronoDuration, Utc};
use serde::Serialize;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;

/// Deletes paragraphs older than `retention_days`. Returns how many were
/// removed. An aggregation job that outlives its paragraph will observe
/// `NotFound` and be discarded; an expected race, not a defect.
pub async fn run_retention(pool: &Pool<Sqlite>, retention_days: i64) -> Result<u64> {
    let cutoff = Utc::now() - ChronoDuration::days(retention_days);
    let removed = store::paragraphs::delete_older_than(pool, cutoff).await?;

    if removed > 0 {
        tracing::info!("Retention sweep removed {} stale paragraphs", removed);
    }

    Ok(removed)
}

/// Reads the current aggregate totals.
pub async fn snapshot(pool: &Pool<Sqlite>) -> Result<SnapshotTotals> {
    store::occurrences::snapshot_totals(pool).await
}

/// How long a finished (non-dead-letter) job entry survives before the
/// hourly sweep drops it from the queue map.
const FINISHED_JOB_TTL_MS: u64 = 60 * 60 * 1000;

/// Spawns the periodic retention sweep and daily statistics snapshot.
/// The hourly sweep also prunes finished job entries from the queue.
pub fn spawn_schedules(pool: Pool<Sqlite>, queue: Arc<JobQueue>, retention_days: i64) {
    let sweep_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            if let Err(e) = run_retention(&sweep_pool, retention_days).await {
                tracing::error!("Retention sweep failed: {}", e);
            }
            queue.prune_finished(FINISHED_JOB_TTL_MS);
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60 * 24));
        loop {
            interval.tick().await;
            match snapshot(&pool).await {
                Ok(totals) => {
                    tracing::info!(
                        "Daily snapshot: {} paragraphs, {} occurrence rows, {} distinct words, {} tokens",
                        totals.paragraph_count,
                        totals.occurrence_rows,
                        totals.distinct_words,
                        totals.total_tokens
                    );
                }
                Err(e) => {
                    tracing::error!("Snapshot failed: {}", e);
                }
            }
        }
    });
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub totals: SnapshotTotals,
    pub jobs_pending: usize,
    pub jobs_running: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,
    pub jobs_dead_lettered: usize,
}

/// `GET /stats`: the snapshot totals plus job queue health on demand.
pub async fn handle_stats(
    Extension(pool): Extension<Pool<Sqlite>>,
    Extension(queue): Extension<Arc<JobQueue>>,
) -> (StatusCode, Json<Option<StatsResponse>>) {
    match snapshot(&pool).await {
        Ok(totals) => {
            let (pending, running, completed, failed, dead) = queue.status_counts();
            (
                StatusCode::OK,
                Json(Some(StatsResponse {
                    totals,
                    jobs_pending: pending,
                    jobs_running: running,
                    jobs_completed: completed,
                    jobs_failed: failed,
                    jobs_dead_lettered: dead,
                })),
            )
        }
        Err(e) => {
            tracing::error!("Stats query failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(None))
        }
    }
}
