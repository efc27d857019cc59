//! Asynchronous Job Module
//!
//! An in-process, at-least-once job broker driving the aggregation pipeline.
//!
//! ## Architecture Overview
//! The broker follows a **Pull-based** model with **Lease** management:
//! 1. **Submission**: Jobs enter the `JobQueue` as `Pending` entries. The
//!    queue guarantees at-least-once delivery: a published job is eventually
//!    seen by some worker, possibly more than once.
//! 2. **Execution**: Workers poll for eligible jobs and "claim" one by
//!    atomically flipping it to `Running` under a lease. If the worker dies,
//!    the lease expires and the job becomes eligible again. This is exactly
//!    why every handler must be idempotent.
//! 3. **Retry**: A job failing with a transient error re-enters `Pending`
//!    after a bounded exponential backoff. Once its attempt budget is
//!    exhausted it moves to `DeadLettered` and is reported, never silently
//!    dropped. Non-retryable failures are logged and discarded as `Failed`.
//!
//! ## Submodules
//! - **`queue`**: The shared job store: eligibility, claiming, leasing,
//!   retry/dead-letter bookkeeping.
//! - **`worker`**: The worker pool and execution lifecycle
//!   (claim -> run -> complete).
//! - **`registry`**: Maps handler names (e.g. "aggregate_paragraph") to
//!   executable async code.
//! - **`sink`**: The transport-agnostic submission interface; enqueueing and
//!   direct invocation are interchangeable behind it.
//! - **`handlers`**: HTTP endpoint for job status queries.
//! - **`types`**: Job, status, and entry definitions.

pub mod handlers;
pub mod queue;
pub mod registry;
pub mod sink;
pub mod types;
pub mod worker;

#[cfg(test)]
mod tests;
