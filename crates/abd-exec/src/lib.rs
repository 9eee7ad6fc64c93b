//! Local collaborator backends for the dispatch pipeline.
//!
//! - [`MemoryQueue`]: lease-based queue kept in process memory;
//! - [`LocalIssuer`]: mints random session credentials with the fixed lifetime;
//! - `SubprocessOrchestrator` (feature `subprocess`): starts one OS process per task.
mod error;
pub use error::ExecError;

mod queue;
pub use queue::MemoryQueue;

mod issuer;
pub use issuer::LocalIssuer;

#[cfg(feature = "subprocess")]
pub mod subprocess;

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use abd_core::{
        BuildQueue, CoreError, DispatchConfig, DispatchContext, DispatchError, DispatchOutcome,
        Pipeline, RunTaskRequest, RunTaskResponse, TaskOrchestrator,
    };
    use abd_model::{ActivationEvent, BuildRequest, LaunchFailure, TaskDescriptor};

    use super::*;

    /// Orchestrator failing the first `failures` launches, then starting tasks.
    struct FlakyOrchestrator {
        failures: Mutex<u32>,
        requests: Mutex<Vec<RunTaskRequest>>,
    }

    impl FlakyOrchestrator {
        fn new(failures: u32) -> Self {
            Self {
                failures: Mutex::new(failures),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TaskOrchestrator for FlakyOrchestrator {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn run_task(&self, req: &RunTaskRequest) -> Result<RunTaskResponse, CoreError> {
            self.requests.lock().await.push(req.clone());
            let mut left = self.failures.lock().await;
            if *left > 0 {
                *left -= 1;
                return Ok(RunTaskResponse {
                    tasks: Vec::new(),
                    failures: vec![LaunchFailure::new("RESOURCE:MEMORY")],
                });
            }
            Ok(RunTaskResponse {
                tasks: vec![TaskDescriptor {
                    task_arn: "task/1".into(),
                    task_definition: req.task_definition.clone(),
                    cluster: req.cluster.clone(),
                    last_status: None,
                    started_by: Some(req.started_by.clone()),
                }],
                failures: Vec::new(),
            })
        }
    }

    fn config() -> DispatchConfig {
        DispatchConfig {
            builder_role: "arn:aws:iam::1:role/addon-builder".into(),
            function_arn: "arn:aws:lambda:us-east-1:1:function:process".into(),
            bucket: "addon-builds".into(),
            visibility_timeout_secs: 5,
            ..Default::default()
        }
    }

    fn event() -> ActivationEvent {
        ActivationEvent::for_request(&BuildRequest::new("ember-foo", "1.0.0", "3.4.0"))
    }

    #[tokio::test(start_paused = true)]
    async fn failed_launch_is_retried_by_next_activation() {
        let queue = Arc::new(MemoryQueue::new("builds"));
        let orch = Arc::new(FlakyOrchestrator::new(1));
        let ctx = DispatchContext::new(queue.clone(), Arc::new(LocalIssuer::new()), orch.clone());
        let pipeline = Pipeline::new(config(), ctx).unwrap();

        let err = pipeline.run(&event()).await.unwrap_err();
        assert!(matches!(err, DispatchError::LaunchRejected { .. }));
        assert_eq!(queue.len().await, 1);

        // Still leased: a second activation finds nothing to do.
        let idle = pipeline.run(&ActivationEvent::empty()).await.unwrap();
        assert!(matches!(idle, DispatchOutcome::Idle { enqueued: None }));

        tokio::time::advance(Duration::from_secs(6)).await;
        let outcome = pipeline.run(&ActivationEvent::empty()).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Dispatched { .. }));
        assert!(queue.is_empty().await);

        let requests = orch.requests.lock().await;
        assert_eq!(requests.len(), 2);
        // Different deliveries, different idempotency keys.
        assert_ne!(requests[0].client_token, requests[1].client_token);
    }

    #[tokio::test(start_paused = true)]
    async fn poison_message_moves_to_dead_letter_queue() {
        let queue = Arc::new(MemoryQueue::new("builds"));
        let dead = Arc::new(MemoryQueue::new("builds-dead"));
        let ctx = DispatchContext::new(
            queue.clone(),
            Arc::new(LocalIssuer::new()),
            Arc::new(FlakyOrchestrator::new(u32::MAX)),
        )
        .with_dead_letter(dead.clone());
        let mut cfg = config();
        cfg.dead_letter.max_receives = Some(1);
        let pipeline = Pipeline::new(cfg, ctx).unwrap();

        assert!(pipeline.run(&event()).await.is_err());
        tokio::time::advance(Duration::from_secs(6)).await;

        let outcome = pipeline.run(&ActivationEvent::empty()).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::DeadLettered { receive_count: 2, .. }));
        assert!(queue.is_empty().await);

        let moved = dead.lease(Duration::from_secs(1)).await.unwrap().unwrap();
        assert_eq!(BuildRequest::from_body(&moved.body).unwrap().addon, "ember-foo");
    }

    #[tokio::test]
    async fn issued_policy_is_scoped_to_the_build_path() {
        let queue = Arc::new(MemoryQueue::new("builds"));
        let issuer = Arc::new(LocalIssuer::new());
        let ctx = DispatchContext::new(queue, issuer.clone(), Arc::new(FlakyOrchestrator::new(0)));
        let pipeline = Pipeline::new(config(), ctx).unwrap();

        pipeline.run(&event()).await.unwrap();

        let policy = issuer.last_policy().await.unwrap();
        assert!(policy.contains("arn:aws:s3:::addon-builds/ember-3.4.0/ember-foo/1.0.0/*"));
    }
}
