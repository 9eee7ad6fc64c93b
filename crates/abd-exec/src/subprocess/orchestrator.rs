use std::{collections::HashMap, process::Stdio};

use async_trait::async_trait;
use tokio::{process::Command, sync::Mutex};
use tracing::{debug, info, trace, warn};

use abd_core::{CoreError, RunTaskRequest, RunTaskResponse, TaskOrchestrator};
use abd_model::{Env, LaunchFailure, TaskDescriptor};

use crate::{ExecError, subprocess::LocalTemplate};

/// Status reported for a freshly spawned process.
const STATUS_RUNNING: &str = "RUNNING";
/// Failure reason for an unknown template identifier.
pub(crate) const REASON_MISSING_TEMPLATE: &str = "MISSING_TEMPLATE";
/// Failure reason prefix for a process that could not be spawned.
pub(crate) const REASON_SPAWN_FAILED: &str = "SPAWN_FAILED";

/// Orchestrator that runs every task as a child process of the dispatcher.
///
/// Launches carrying an already seen `client_token` return the tasks started
/// the first time instead of spawning again. The token is derived from the lease
/// receipt, so this only covers a retried launch of the same delivery: a
/// redelivered message gets a new receipt and starts a new task.
pub struct SubprocessOrchestrator {
    name: &'static str,
    templates: HashMap<String, LocalTemplate>,
    /// Tasks by `client_token`, kept for the lifetime of the orchestrator.
    /// Never pruned: the dispatcher process runs a single activation.
    launched: Mutex<HashMap<String, Vec<TaskDescriptor>>>,
}

impl SubprocessOrchestrator {
    /// Create an orchestrator over validated templates.
    pub fn new(
        name: &'static str,
        templates: HashMap<String, LocalTemplate>,
    ) -> Result<Self, ExecError> {
        for (id, template) in &templates {
            if id.trim().is_empty() {
                return Err(ExecError::InvalidConfig("template id is empty".into()));
            }
            template.validate(id)?;
        }
        Ok(Self {
            name,
            templates,
            launched: Mutex::new(HashMap::new()),
        })
    }

    fn environment(req: &RunTaskRequest) -> Env {
        let mut env = Env::new();
        for ov in &req.container_overrides {
            for kv in ov.environment.iter() {
                env.push(kv.name(), kv.value());
            }
        }
        env
    }

    fn spawn(
        &self,
        template: &LocalTemplate,
        env: &Env,
        req: &RunTaskRequest,
    ) -> Result<TaskDescriptor, LaunchFailure> {
        trace!(
            template = %req.task_definition,
            command = %template.command,
            args = ?template.args,
            cwd = ?template.cwd,
            env_len = env.len(),
            "spawning subprocess",
        );

        let mut cmd = Command::new(&template.command);
        cmd.args(&template.args);
        if let Some(cwd) = &template.cwd {
            cmd.current_dir(cwd);
        }
        for kv in env.iter() {
            cmd.env(kv.name(), kv.value());
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| LaunchFailure {
            arn: Some(req.task_definition.clone()),
            reason: format!("{REASON_SPAWN_FAILED}: {e}"),
        })?;
        let pid = child.id().map_or_else(|| "exited".to_string(), |p| p.to_string());
        let task_arn = format!("local:{}/{pid}", req.cluster);

        let arn = task_arn.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!(task = %arn, "subprocess exited successfully"),
                Ok(status) => match status.code() {
                    Some(code) => warn!(task = %arn, code, "subprocess exited with non-zero code"),
                    None => warn!(task = %arn, "subprocess terminated by signal"),
                },
                Err(e) => warn!(task = %arn, error = %e, "wait failed"),
            }
        });

        Ok(TaskDescriptor {
            task_arn,
            task_definition: req.task_definition.clone(),
            cluster: req.cluster.clone(),
            last_status: Some(STATUS_RUNNING.to_string()),
            started_by: Some(req.started_by.clone()),
        })
    }
}

#[async_trait]
impl TaskOrchestrator for SubprocessOrchestrator {
    fn name(&self) -> &str {
        self.name
    }

    async fn run_task(&self, req: &RunTaskRequest) -> Result<RunTaskResponse, CoreError> {
        if req.count == 0 {
            return Err(CoreError::Rejected("count must be at least 1".into()));
        }

        let mut launched = self.launched.lock().await;
        if let Some(tasks) = launched.get(&req.client_token) {
            debug!(token = %req.client_token, "launch already performed");
            return Ok(RunTaskResponse {
                tasks: tasks.clone(),
                failures: Vec::new(),
            });
        }

        let Some(template) = self.templates.get(&req.task_definition) else {
            warn!(template = %req.task_definition, "unknown task template");
            return Ok(RunTaskResponse {
                tasks: Vec::new(),
                failures: vec![LaunchFailure {
                    arn: Some(req.task_definition.clone()),
                    reason: REASON_MISSING_TEMPLATE.to_string(),
                }],
            });
        };

        let env = Self::environment(req);
        let mut resp = RunTaskResponse::default();
        for _ in 0..req.count {
            match self.spawn(template, &env, req) {
                Ok(task) => resp.tasks.push(task),
                Err(failure) => resp.failures.push(failure),
            }
        }

        if !resp.tasks.is_empty() {
            launched.insert(req.client_token.clone(), resp.tasks.clone());
        }
        info!(
            orchestrator = self.name,
            template = %req.task_definition,
            started = resp.tasks.len(),
            failed = resp.failures.len(),
            "run_task finished"
        );
        Ok(resp)
    }
}
