//! Text Analysis Module
//!
//! The core of the pipeline: turning a paragraph's raw text into persisted
//! per-word frequency rows.
//!
//! ## Workflow
//! 1. **Tokenize**: Normalize the paragraph text into lowercase word tokens.
//! 2. **Count**: Build a local frequency map scoped to this one job, no
//!    shared in-process accumulation across jobs.
//! 3. **Persist**: Write one row per distinct word with insert-if-absent
//!    semantics, so duplicate or concurrent jobs for the same paragraph are
//!    harmless.
//!
//! ## Submodules
//! - **`tokenizer`**: Pure text processing (normalization, filtering,
//!   frequency counting).
//! - **`aggregator`**: The job body: load, tokenize, persist, report.
//! - **`types`**: The aggregation result and job payload.

pub mod aggregator;
pub mod tokenizer;
pub mod types;
