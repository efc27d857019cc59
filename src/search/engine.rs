//! The ranked retrieval query.

use super::types::RankedResult;
use crate::analysis::tokenizer::normalize_word;
use crate::error::{Error, Result};
use crate::store;
use sqlx::{Pool, Sqlite};

/// Default number of results when the caller does not specify a limit.
pub const DEFAULT_LIMIT: u32 = 10;

/// Characters of paragraph text included in each result.
const PREVIEW_CHARS: usize = 500;

/// Returns the top paragraphs containing `word`, ranked by stored occurrence
/// count (descending, ties broken by paragraph id ascending).
///
/// The word is normalized like an indexed token before matching, so a search
/// for "PYTHON" finds occurrences created from "Python". A zero limit or a
/// word shorter than two characters after normalization is an
/// `InvalidArgument`: nothing that short is ever indexed.
pub async fn search(
    pool: &Pool<Sqlite>,
    word: &str,
    limit: Option<u32>,
) -> Result<Vec<RankedResult>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(Error::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }

    let normalized = normalize_word(word);
    if normalized.chars().count() < 2 {
        return Err(Error::InvalidArgument(
            "word must be at least 2 characters".to_string(),
        ));
    }

    let rows = store::occurrences::ranked_by_word(pool, &normalized, limit).await?;

    tracing::debug!("Search '{}' matched {} paragraphs", normalized, rows.len());

    Ok(rows
        .into_iter()
        .map(|row| RankedResult {
            paragraph_id: row.paragraph_id,
            submitter_name: row.submitter_name,
            raw_text: row.raw_text.chars().take(PREVIEW_CHARS).collect(),
            word_count: row.count,
            created_at: row.created_at,
        })
        .collect())
}
