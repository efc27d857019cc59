//! Job Handler Registry
//!
//! A dynamic registry that maps string-based job names (e.g.
//! "aggregate_paragraph") to executable Rust closures. This keeps the queue
//! and worker modules generic: they move `Job` values around without knowing
//! what any of them do.

use super::types::*;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a thread-safe, asynchronous job handler function.
/// It takes a `Job` and returns a Future that resolves to a `Result<()>`.
pub type JobHandlerFn =
    Arc<dyn Fn(Job) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Registry holding the mapping between job names and their implementation.
pub struct JobHandlerRegistry {
    handlers: DashMap<String, JobHandlerFn>,
}

impl JobHandlerRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: DashMap::new(),
        })
    }

    /// Registers a new handler function under a specific name.
    pub fn register<F, Fut>(&self, handler_name: &str, handler: F)
    where
        F: Fn(Job) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        // Box::pin type-erases the concrete Future so differently-typed
        // async functions can live in the same map.
        let handler_fn: JobHandlerFn = Arc::new(move |job: Job| {
            Box::pin(handler(job)) as Pin<Box<dyn Future<Output = Result<()>> + Send>>
        });

        self.handlers.insert(handler_name.to_string(), handler_fn);

        tracing::info!("Registered job handler: {}", handler_name);
    }

    /// Looks up a handler by name and executes it with the provided job.
    ///
    /// An unknown handler name is a wiring mistake, not a transient fault,
    /// so it surfaces as `InvalidArgument` and is never retried.
    pub async fn execute(&self, job: &Job) -> Result<()> {
        let name = job.handler_name();

        if let Some(handler_fn) = self.handlers.get(name) {
            tracing::debug!("Executing job with handler '{}'", name);
            handler_fn.value()(job.clone()).await
        } else {
            let error = format!("unknown job handler: {}", name);
            tracing::error!("{}", error);
            Err(Error::InvalidArgument(error))
        }
    }

    /// Checks if a handler is registered.
    pub fn has_handler(&self, handler_name: &str) -> bool {
        self.handlers.contains_key(handler_name)
    }

    /// Returns the total number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for JobHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}
