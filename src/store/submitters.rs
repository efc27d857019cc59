//! Submitter reference rows.
//!
//! Identity lives with an external provider; the core only keeps the
//! (id, display name) pair it needs to label ranked search results.

use super::types::Submitter;
use crate::error::{Error, Result};
use sqlx::{Pool, Row, Sqlite};

/// Records (or refreshes) a submitter reference handed to us by the identity
/// collaborator. Last write wins on the display name.
pub async fn upsert(pool: &Pool<Sqlite>, id: &str, display_name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO submitters (id, display_name) VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
        "#,
    )
    .bind(id)
    .bind(display_name)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &Pool<Sqlite>, id: &str) -> Result<Submitter> {
    let row = sqlx::query("SELECT id, display_name FROM submitters WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("submitter {}", id)))?;

    Ok(Submitter {
        id: row.get("id"),
        display_name: row.get("display_name"),
    })
}
