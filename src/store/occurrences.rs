//! Word occurrence queries: the upsert-if-absent write and ranked retrieval.

use super::types::{RankedRow, SnapshotTotals, WordOccurrence};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// Inserts a (paragraph, word, count) row, or does nothing if a row for the
/// same (paragraph, word) pair already exists.
///
/// This is the write that makes aggregation jobs safely re-enqueueable: the
/// uniqueness constraint absorbs duplicate and concurrent runs without ever
/// updating an existing count. Returns `true` if a row was actually written.
pub async fn insert_if_absent(
    pool: &Pool<Sqlite>,
    paragraph_id: Uuid,
    word: &str,
    count: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO word_occurrences (paragraph_id, word, count)
        VALUES (?, ?, ?)
        ON CONFLICT(paragraph_id, word) DO NOTHING
        "#,
    )
    .bind(paragraph_id.to_string())
    .bind(word)
    .bind(count)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All occurrence rows for one paragraph, ordered by word.
pub async fn for_paragraph(pool: &Pool<Sqlite>, paragraph_id: Uuid) -> Result<Vec<WordOccurrence>> {
    let rows = sqlx::query(
        "SELECT word, count FROM word_occurrences WHERE paragraph_id = ? ORDER BY word",
    )
    .bind(paragraph_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| WordOccurrence {
            paragraph_id,
            word: row.get("word"),
            count: row.get("count"),
        })
        .collect())
}

/// Top paragraphs for a word, joined with submitter identity.
///
/// Ordered by count descending; ties broken by paragraph id ascending so the
/// result is reproducible across calls.
pub async fn ranked_by_word(
    pool: &Pool<Sqlite>,
    word: &str,
    limit: u32,
) -> Result<Vec<RankedRow>> {
    let rows = sqlx::query(
        r#"
        SELECT w.paragraph_id, w.count, p.raw_text, p.created_at, s.display_name
        FROM word_occurrences w
        JOIN paragraphs p ON w.paragraph_id = p.id
        JOIN submitters s ON p.submitter_id = s.id
        WHERE w.word = ?
        ORDER BY w.count DESC, w.paragraph_id ASC
        LIMIT ?
        "#,
    )
    .bind(word)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let id_text: String = row.get("paragraph_id");
            let paragraph_id = Uuid::parse_str(&id_text)
                .map_err(|e| Error::StoreUnavailable(format!("corrupt paragraph id: {}", e)))?;
            let created_text: String = row.get("created_at");
            let created_at = DateTime::parse_from_rfc3339(&created_text)
                .map_err(|e| Error::StoreUnavailable(format!("corrupt timestamp: {}", e)))?
                .with_timezone(&Utc);

            Ok(RankedRow {
                paragraph_id,
                submitter_name: row.get("display_name"),
                raw_text: row.get("raw_text"),
                count: row.get("count"),
                created_at,
            })
        })
        .collect()
}

/// Aggregate totals for the daily statistics snapshot.
pub async fn snapshot_totals(pool: &Pool<Sqlite>) -> Result<SnapshotTotals> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM paragraphs)                        AS paragraph_count,
            (SELECT COUNT(*) FROM word_occurrences)                  AS occurrence_rows,
            (SELECT COUNT(DISTINCT word) FROM word_occurrences)      AS distinct_words,
            (SELECT COALESCE(SUM(count), 0) FROM word_occurrences)   AS total_tokens
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(SnapshotTotals {
        paragraph_count: row.get("paragraph_count"),
        occurrence_rows: row.get("occurrence_rows"),
        distinct_words: row.get("distinct_words"),
        total_tokens: row.get("total_tokens"),
    })
}
