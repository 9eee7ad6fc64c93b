use tracing::{error, info};

use abd_model::{ENV_ADDON_NAME, ENV_ADDON_VERSION, LeasedBuild, task_template_id};

use crate::{
    config::DispatchConfig,
    error::{CoreError, DispatchError},
    ports::{ContainerOverride, RunTaskRequest, TaskOrchestrator},
};

/// Map a credentialed lease to the orchestrator request.
///
/// The build container receives exactly five variables: the three credential
/// fields, then `ADDON_NAME` and `ADDON_VERSION`.
pub fn run_task_request(
    cfg: &DispatchConfig,
    lease: &LeasedBuild,
) -> Result<RunTaskRequest, DispatchError> {
    let request = lease.request();
    let Some(creds) = lease.credentials() else {
        return Err(DispatchError::Launch {
            request: request.clone(),
            source: CoreError::Rejected("no credentials attached to lease".into()),
        });
    };

    let mut environment = creds.to_env();
    environment.push(ENV_ADDON_NAME, request.addon.as_str());
    environment.push(ENV_ADDON_VERSION, request.addon_version.as_str());

    Ok(RunTaskRequest {
        task_definition: task_template_id(&cfg.template_prefix, &request.ember_version),
        cluster: cfg.cluster.clone(),
        count: 1,
        container_overrides: vec![ContainerOverride {
            name: cfg.container_name.clone(),
            environment,
        }],
        started_by: cfg.started_by.clone(),
        client_token: lease.idempotency_key(),
    })
}

/// Start exactly one build task and attach its descriptor.
///
/// Any failure entry from the orchestrator is a hard error, even if a task was
/// also reported: the caller must not acknowledge a build that did not cleanly start.
pub async fn launch_task(
    orchestrator: &dyn TaskOrchestrator,
    cfg: &DispatchConfig,
    lease: LeasedBuild,
) -> Result<LeasedBuild, DispatchError> {
    let req = run_task_request(cfg, &lease)?;
    info!(
        orchestrator = orchestrator.name(),
        template = %req.task_definition,
        cluster = %req.cluster,
        client_token = %req.client_token,
        "running build"
    );

    let resp = orchestrator
        .run_task(&req)
        .await
        .map_err(|source| DispatchError::Launch {
            request: lease.request().clone(),
            source,
        })?;

    if let Some(failure) = resp.failures.first() {
        error!(
            template = %req.task_definition,
            reason = %failure,
            started = resp.tasks.len(),
            "starting task failed"
        );
        return Err(DispatchError::LaunchRejected {
            request: lease.request().clone(),
            failure: failure.clone(),
            started: resp.tasks,
        });
    }
    let Some(task) = resp.tasks.into_iter().next() else {
        return Err(DispatchError::NoTaskStarted {
            request: lease.request().clone(),
        });
    };
    info!(task = %task, "build task started");
    Ok(lease.with_task(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeOrchestrator, LaunchMode};
    use abd_model::{BuildRequest, ScopedCredentials};
    use time::{Duration, OffsetDateTime};

    fn cfg() -> DispatchConfig {
        DispatchConfig {
            template_prefix: "addon-builder".into(),
            ..Default::default()
        }
    }

    fn lease() -> LeasedBuild {
        let now = OffsetDateTime::now_utc();
        LeasedBuild::new(BuildRequest::new("foo", "1.0.0", "3.2.0"), "r-1".into(), 1)
            .with_credentials(ScopedCredentials::new(
                "ASIA1",
                "secret",
                "token",
                now,
                now + Duration::seconds(900),
            ))
    }

    #[test]
    fn request_selects_template_by_runtime_version() {
        let req = run_task_request(&cfg(), &lease()).unwrap();
        assert_eq!(req.task_definition, "addon-builder-3-2-0");
        assert_eq!(req.cluster, "ember-twiddle");
        assert_eq!(req.count, 1);
        assert_eq!(req.started_by, "ember-twiddle-scheduler");
        assert_eq!(req.client_token, lease().idempotency_key());
    }

    #[test]
    fn request_injects_exactly_five_variables() {
        let req = run_task_request(&cfg(), &lease()).unwrap();
        assert_eq!(req.container_overrides.len(), 1);

        let ov = &req.container_overrides[0];
        assert_eq!(ov.name, "addon-builder");
        assert_eq!(
            ov.environment.names().collect::<Vec<_>>(),
            vec![
                "AWS_ACCESS_KEY_ID",
                "AWS_SECRET_ACCESS_KEY",
                "AWS_SESSION_TOKEN",
                "ADDON_NAME",
                "ADDON_VERSION"
            ]
        );
        assert_eq!(ov.environment.get("ADDON_NAME"), Some("foo"));
        assert_eq!(ov.environment.get("ADDON_VERSION"), Some("1.0.0"));
        assert_eq!(ov.environment.get("AWS_SESSION_TOKEN"), Some("token"));
    }

    #[test]
    fn request_requires_credentials() {
        let bare = LeasedBuild::new(BuildRequest::new("foo", "1.0.0", "3.2.0"), "r-1".into(), 1);
        assert!(run_task_request(&cfg(), &bare).is_err());
    }

    #[tokio::test]
    async fn started_task_is_attached() {
        let orch = FakeOrchestrator::default();
        let out = launch_task(&orch, &cfg(), lease()).await.unwrap();
        let task = out.task().unwrap();
        assert_eq!(task.task_definition, "addon-builder-3-2-0");
        assert_eq!(orch.calls(), 1);
    }

    #[tokio::test]
    async fn failure_entry_is_a_hard_error() {
        let orch = FakeOrchestrator::with_mode(LaunchMode::Failure);
        let err = launch_task(&orch, &cfg(), lease()).await.unwrap_err();
        match err {
            DispatchError::LaunchRejected { failure, started, .. } => {
                assert_eq!(failure.reason, "RESOURCE:MEMORY");
                assert!(started.is_empty());
            }
            other => panic!("expected LaunchRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_alongside_started_task_still_errors_and_reports_task() {
        let orch = FakeOrchestrator::with_mode(LaunchMode::StartedWithFailure);
        let err = launch_task(&orch, &cfg(), lease()).await.unwrap_err();
        assert_eq!(err.started_tasks().len(), 1);
    }

    #[tokio::test]
    async fn empty_response_is_an_error() {
        let orch = FakeOrchestrator::with_mode(LaunchMode::Nothing);
        let err = launch_task(&orch, &cfg(), lease()).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoTaskStarted { .. }));
    }
}
