//! Paragraph Word-Count Pipeline Library
//!
//! This library crate defines the core modules of the asynchronous
//! text-analysis pipeline. It serves as the foundation for the binary
//! executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`dispatch`**: The intake pipeline. Splits a free-text submission into
//!   paragraph units, persists each unit, and publishes one aggregation job
//!   per unit with per-unit outcome reporting.
//! - **`jobs`**: The asynchronous job engine. An in-process at-least-once
//!   broker with lease-based claiming, bounded retry with backoff, and a
//!   dead-letter state, driven by a polling worker pool.
//! - **`analysis`**: The text analysis core. Contains the tokenizer and the
//!   idempotent frequency aggregator.
//! - **`search`**: The ranked retrieval logic: top paragraphs per word,
//!   joined with submitter identity.
//! - **`store`**: The durable state layer. SQLite via sqlx; its
//!   (paragraph, word) uniqueness constraint is the concurrency guard that
//!   makes duplicate job execution safe.
//! - **`maintenance`**: Scheduled retention sweep and statistics snapshot.

pub mod analysis;
pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod maintenance;
pub mod search;
pub mod store;
