//! Submission Dispatch Module
//!
//! The intake side of the pipeline: takes a raw free-text submission, splits
//! it into paragraph units, persists each unit, and publishes one aggregation
//! job per unit.
//!
//! ## Workflow
//! 1. **Split**: Paragraph units are delimited by runs of two or more blank
//!    lines; units are trimmed and empty ones discarded.
//! 2. **Persist**: Each unit becomes one immutable paragraph row, in split
//!    order.
//! 3. **Publish**: One aggregation job per paragraph goes through the
//!    `JobSink`. Enqueue is fire-and-forget; dispatch never waits for
//!    aggregation.
//! 4. **Report**: The caller gets the ordered paragraph ids plus a per-unit
//!    outcome, so a publish failure after a successful persist (an orphaned
//!    paragraph) is visible and only the failed units need resubmitting.

pub mod dispatcher;
pub mod handlers;
pub mod types;
