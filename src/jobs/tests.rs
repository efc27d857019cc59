//! Jobs Module Tests
//!
//! Validates the broker mechanics: registration and execution, atomic
//! claiming, lease-expiry redelivery, retry backoff, and the dead-letter
//! terminal state.

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::jobs::queue::JobQueue;
    use crate::jobs::registry::JobHandlerRegistry;
    use crate::jobs::sink::{InlineSink, JobSink};
    use crate::jobs::types::{now_ms, Job, JobStatus, RetryPolicy};
    use crate::jobs::worker::WorkerPool;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_job() -> Job {
        Job::Execute {
            handler: "test_handler".to_string(),
            payload: serde_json::json!({"paragraph_id": "abc"}),
        }
    }

    /// Policy with zero backoff so retry paths run instantly.
    fn instant_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    // ============================================================
    // REGISTRY
    // ============================================================

    #[tokio::test]
    async fn test_registry_register_and_execute() {
        let registry = JobHandlerRegistry::new();
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        registry.register("test_handler", move |_job| {
            let count = call_count_clone.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        assert!(registry.has_handler("test_handler"));
        assert_eq!(registry.handler_count(), 1);

        registry.execute(&test_job()).await.unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_registry_unknown_handler_is_invalid_argument() {
        let registry = JobHandlerRegistry::new();

        let result = registry.execute(&test_job()).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_registry_handler_receives_payload() {
        let registry = JobHandlerRegistry::new();
        let received = Arc::new(tokio::sync::Mutex::new(None));
        let received_clone = received.clone();

        registry.register("test_handler", move |job| {
            let received = received_clone.clone();
            async move {
                let Job::Execute { payload, .. } = job;
                *received.lock().await = Some(payload);
                Ok(())
            }
        });

        registry.execute(&test_job()).await.unwrap();

        let payload = received.lock().await;
        assert_eq!(payload.as_ref().unwrap()["paragraph_id"], "abc");
    }

    // ============================================================
    // QUEUE - claiming
    // ============================================================

    #[tokio::test]
    async fn test_enqueue_makes_job_eligible() {
        let queue = JobQueue::default();

        let job_id = queue.enqueue(test_job()).unwrap();

        let entry = queue.get(&job_id).unwrap();
        assert_eq!(entry.status, JobStatus::Pending);
        assert_eq!(entry.attempts, 0);

        let eligible = queue.eligible_jobs();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].0, job_id);
    }

    #[tokio::test]
    async fn test_claim_is_mutually_exclusive() {
        let queue = JobQueue::default();
        let job_id = queue.enqueue(test_job()).unwrap();

        assert!(queue.try_claim(&job_id).unwrap());
        // A second worker racing for the same job must lose
        assert!(!queue.try_claim(&job_id).unwrap());

        let entry = queue.get(&job_id).unwrap();
        assert_eq!(entry.status, JobStatus::Running);
        assert_eq!(entry.attempts, 1);
        assert!(entry.lease_expires.unwrap() > now_ms());
    }

    #[tokio::test]
    async fn test_completed_job_is_terminal() {
        let queue = JobQueue::default();
        let job_id = queue.enqueue(test_job()).unwrap();

        queue.try_claim(&job_id).unwrap();
        queue.complete(&job_id).unwrap();

        assert_eq!(queue.get(&job_id).unwrap().status, JobStatus::Completed);
        assert!(queue.eligible_jobs().is_empty());
        assert!(!queue.try_claim(&job_id).unwrap());
    }

    // ============================================================
    // QUEUE - lease expiry redelivery (at-least-once)
    // ============================================================

    #[tokio::test]
    async fn test_expired_lease_allows_reclaim() {
        let queue = JobQueue::default();
        let job_id = queue.enqueue(test_job()).unwrap();

        assert!(queue.try_claim(&job_id).unwrap());
        assert!(queue.eligible_jobs().is_empty(), "leased job is owned");

        // Worker crashed: its lease runs out
        queue.expire_lease_now(&job_id);

        let eligible = queue.eligible_jobs();
        assert_eq!(eligible.len(), 1, "abandoned job must be redelivered");

        assert!(queue.try_claim(&job_id).unwrap());
        assert_eq!(queue.get(&job_id).unwrap().attempts, 2);
    }

    #[tokio::test]
    async fn test_renew_lease_keeps_job_owned() {
        let queue = JobQueue::default();
        let job_id = queue.enqueue(test_job()).unwrap();
        queue.try_claim(&job_id).unwrap();

        assert!(queue.renew_lease(&job_id));

        queue.complete(&job_id).unwrap();
        assert!(!queue.renew_lease(&job_id), "finished job needs no lease");
    }

    // ============================================================
    // QUEUE - retry and dead-letter
    // ============================================================

    #[tokio::test]
    async fn test_transient_failure_schedules_retry() {
        let queue = JobQueue::new(RetryPolicy::default());
        let job_id = queue.enqueue(test_job()).unwrap();

        queue.try_claim(&job_id).unwrap();
        queue
            .fail(&job_id, &Error::StoreUnavailable("db down".to_string()))
            .unwrap();

        let entry = queue.get(&job_id).unwrap();
        assert_eq!(entry.status, JobStatus::Pending);
        assert!(
            entry.not_before > now_ms(),
            "retry must wait out its backoff deadline"
        );
        assert!(queue.eligible_jobs().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_retries_move_to_dead_letter() {
        let queue = JobQueue::new(instant_retry(3));
        let job_id = queue.enqueue(test_job()).unwrap();

        for _ in 0..3 {
            assert!(queue.try_claim(&job_id).unwrap());
            queue
                .fail(&job_id, &Error::StoreUnavailable("db down".to_string()))
                .unwrap();
        }

        let entry = queue.get(&job_id).unwrap();
        assert!(matches!(entry.status, JobStatus::DeadLettered { .. }));
        assert!(queue.eligible_jobs().is_empty(), "dead letter is terminal");

        // Reported, never silently dropped
        let dead = queue.dead_letters();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].0, job_id);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_is_final() {
        let queue = JobQueue::new(instant_retry(5));
        let job_id = queue.enqueue(test_job()).unwrap();

        queue.try_claim(&job_id).unwrap();
        queue
            .fail(&job_id, &Error::NotFound("paragraph gone".to_string()))
            .unwrap();

        let entry = queue.get(&job_id).unwrap();
        assert!(matches!(entry.status, JobStatus::Failed { .. }));
        assert_eq!(entry.attempts, 1, "no retry for vanished entities");
        assert!(queue.eligible_jobs().is_empty());
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay_ms: 500,
            max_delay_ms: 4_000,
        };

        // Jitter is below base_delay_ms / 2 + 1, so bounds are checkable
        assert!(policy.backoff_delay_ms(1) >= 500);
        assert!(policy.backoff_delay_ms(1) < 500 + 251);
        assert!(policy.backoff_delay_ms(3) >= 2_000);
        assert!(policy.backoff_delay_ms(8) <= 4_000 + 250, "cap holds");
    }

    // ============================================================
    // QUEUE - pruning of finished entries
    // ============================================================

    #[tokio::test]
    async fn test_prune_drops_finished_jobs_but_keeps_dead_letters() {
        let queue = JobQueue::new(instant_retry(1));

        let completed = queue.enqueue(test_job()).unwrap();
        queue.try_claim(&completed).unwrap();
        queue.complete(&completed).unwrap();

        let failed = queue.enqueue(test_job()).unwrap();
        queue.try_claim(&failed).unwrap();
        queue
            .fail(&failed, &Error::NotFound("paragraph gone".to_string()))
            .unwrap();

        let dead = queue.enqueue(test_job()).unwrap();
        queue.try_claim(&dead).unwrap();
        queue
            .fail(&dead, &Error::StoreUnavailable("db down".to_string()))
            .unwrap();
        assert!(matches!(
            queue.get(&dead).unwrap().status,
            JobStatus::DeadLettered { .. }
        ));

        let pending = queue.enqueue(test_job()).unwrap();

        // Entries within the TTL survive
        assert_eq!(queue.prune_finished(60_000), 0);
        assert_eq!(queue.job_count(), 4);

        // Past the TTL only Completed and Failed go
        assert_eq!(queue.prune_finished(0), 2);
        assert_eq!(queue.job_count(), 2);
        assert!(queue.get(&completed).is_none());
        assert!(queue.get(&failed).is_none());
        assert!(queue.get(&pending).is_some());
        assert_eq!(queue.dead_letters().len(), 1, "dead letters are exempt");
    }

    // ============================================================
    // SINKS - interchangeable transports
    // ============================================================

    #[tokio::test]
    async fn test_queue_sink_defers_execution() {
        let queue = JobQueue::default();

        let job_id = queue.submit(test_job()).await.unwrap();

        assert_eq!(queue.get(&job_id).unwrap().status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_inline_sink_executes_immediately() {
        let registry = JobHandlerRegistry::new();
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        registry.register("test_handler", move |_job| {
            let count = call_count_clone.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let sink = InlineSink::new(registry);
        sink.submit(test_job()).await.unwrap();

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inline_sink_surfaces_handler_failure() {
        let registry = JobHandlerRegistry::new();
        registry.register("test_handler", |_job| async {
            Err(Error::StoreUnavailable("db down".to_string()))
        });

        let sink = InlineSink::new(registry);
        let result = sink.submit(test_job()).await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    // ============================================================
    // WORKER POOL - end to end
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_worker_pool_completes_enqueued_job() {
        let queue = Arc::new(JobQueue::default());
        let registry = JobHandlerRegistry::new();
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        registry.register("test_handler", move |_job| {
            let count = call_count_clone.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        WorkerPool::new(queue.clone(), registry, 2).start();

        let job_id = queue.enqueue(test_job()).unwrap();

        // Poll until the pool finishes the job
        for _ in 0..50 {
            if queue.get(&job_id).map(|e| e.status) == Some(JobStatus::Completed) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(queue.get(&job_id).unwrap().status, JobStatus::Completed);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
