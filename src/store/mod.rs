//! Durable Store Module
//!
//! The single source of truth and the sole synchronization point of the
//! pipeline. SQLite via sqlx; the `UNIQUE(paragraph_id, word)` constraint on
//! word occurrences is the concurrency guard that makes duplicate job
//! execution safe, so no in-process locks are needed anywhere above this
//! layer.
//!
//! ## Submodules
//! - **`schema`**: Idempotent table/index creation and pool setup.
//! - **`paragraphs`**: Paragraph rows (insert, lookup, retention delete).
//! - **`occurrences`**: Word occurrence rows (insert-if-absent, ranked
//!   retrieval, snapshot totals).
//! - **`submitters`**: Foreign references to the external identity provider.
//! - **`types`**: Row structs shared across the crate.

pub mod occurrences;
pub mod paragraphs;
pub mod schema;
pub mod submitters;
pub mod types;
