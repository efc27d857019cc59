//! HTTP handler for the search endpoint.

use super::engine::search;
use super::types::SearchResponse;
use crate::error::Error;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::{Pool, Sqlite};

#[derive(Deserialize)]
pub struct SearchParams {
    pub word: String,
    pub limit: Option<u32>,
}

pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(pool): Extension<Pool<Sqlite>>,
) -> (StatusCode, Json<SearchResponse>) {
    match search(&pool, &params.word, params.limit).await {
        Ok(results) => (
            StatusCode::OK,
            Json(SearchResponse {
                word: params.word.trim().to_lowercase(),
                results_count: results.len(),
                results,
            }),
        ),
        Err(e) => {
            let code = match e {
                Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!("Search failed: {}", e);
            (
                code,
                Json(SearchResponse {
                    word: params.word,
                    results_count: 0,
                    results: vec![],
                }),
            )
        }
    }
}
