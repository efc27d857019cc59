//! Database initialization: connection pool and idempotent schema creation.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

/// Opens (creating if missing) the SQLite database at `path`.
///
/// Foreign keys are enabled so deleting a paragraph cascades to its word
/// occurrences; WAL mode plus a busy timeout keeps concurrent workers from
/// tripping over each other's writes.
pub async fn connect(path: &Path) -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Safe to run on every startup. The `UNIQUE(paragraph_id, word)` constraint
/// on `word_occurrences` is load-bearing: it is what makes re-running an
/// aggregation job harmless.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    tracing::info!("Initializing database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submitters (
            id           TEXT PRIMARY KEY,
            display_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS paragraphs (
            id           TEXT PRIMARY KEY,
            submitter_id TEXT NOT NULL REFERENCES submitters(id),
            raw_text     TEXT NOT NULL,
            created_at   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_occurrences (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            paragraph_id TEXT NOT NULL REFERENCES paragraphs(id) ON DELETE CASCADE,
            word         TEXT NOT NULL,
            count        INTEGER NOT NULL,
            UNIQUE(paragraph_id, word)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Ranked retrieval scans by word, so index it.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_word_occurrences_word ON word_occurrences(word)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_paragraphs_created_at ON paragraphs(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
