//! Paragraph row queries.

use super::types::Paragraph;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// Persists a new paragraph unit. Generates its id and creation timestamp.
pub async fn insert(
    pool: &Pool<Sqlite>,
    submitter_id: &str,
    raw_text: &str,
) -> Result<Paragraph> {
    let paragraph = Paragraph {
        id: Uuid::new_v4(),
        submitter_id: submitter_id.to_string(),
        raw_text: raw_text.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO paragraphs (id, submitter_id, raw_text, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(paragraph.id.to_string())
    .bind(&paragraph.submitter_id)
    .bind(&paragraph.raw_text)
    .bind(paragraph.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(paragraph)
}

/// Loads a paragraph by id.
///
/// Returns `NotFound` if the row is absent, a legitimate race with the
/// retention sweep when an aggregation job outlives its paragraph.
pub async fn get(pool: &Pool<Sqlite>, id: Uuid) -> Result<Paragraph> {
    let row = sqlx::query(
        "SELECT id, submitter_id, raw_text, created_at FROM paragraphs WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("paragraph {}", id)))?;

    row_to_paragraph(&row)
}

/// Deletes paragraphs created before `cutoff`; word occurrences cascade.
/// Returns the number of paragraphs removed.
pub async fn delete_older_than(pool: &Pool<Sqlite>, cutoff: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM paragraphs WHERE created_at < ?")
        .bind(cutoff.to_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn row_to_paragraph(row: &sqlx::sqlite::SqliteRow) -> Result<Paragraph> {
    let id_text: String = row.get("id");
    let id = Uuid::parse_str(&id_text)
        .map_err(|e| Error::StoreUnavailable(format!("corrupt paragraph id: {}", e)))?;

    let created_text: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_text)
        .map_err(|e| Error::StoreUnavailable(format!("corrupt timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(Paragraph {
        id,
        submitter_id: row.get("submitter_id"),
        raw_text: row.get("raw_text"),
        created_at,
    })
}
