//! Ranking Query Module
//!
//! Read side of the pipeline: given a word, return the top paragraphs by
//! stored occurrence count.
//!
//! ## Overview
//! The query word is normalized exactly the way the tokenizer normalized the
//! indexed tokens, so search is consistent with what was written. Results are
//! a total order: count descending, ties broken by paragraph id ascending,
//! truncated to the caller's limit. Reads are side-effect free and safe to
//! run concurrently with in-flight aggregation jobs: a paragraph whose job
//! has not finished simply is not in the results yet (eventual consistency,
//! not linearizability).
//!
//! ## Submodules
//! - **`engine`**: Validation, normalization, and the ranked query.
//! - **`handlers`**: HTTP request handler for the search endpoint.
//! - **`types`**: Result DTOs.

pub mod engine;
pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;
