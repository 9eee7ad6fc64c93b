use async_trait::async_trait;
use serde::Serialize;

use abd_model::{Env, LaunchFailure, TaskDescriptor};

use crate::error::CoreError;

/// Environment override for one named container of the task template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerOverride {
    pub name: String,
    pub environment: Env,
}

/// Request to start tasks from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskRequest {
    /// Template identifier (see [`abd_model::task_template_id`]).
    pub task_definition: String,
    pub cluster: String,
    /// Number of task instances to start.
    pub count: u32,
    pub container_overrides: Vec<ContainerOverride>,
    /// Tag recorded on the started task.
    pub started_by: String,
    /// Deterministic idempotency key for orchestrators that deduplicate launches.
    pub client_token: String,
}

/// Orchestrator answer: started tasks and/or failure entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTaskResponse {
    pub tasks: Vec<TaskDescriptor>,
    pub failures: Vec<LaunchFailure>,
}

/// Container orchestration service.
#[async_trait]
pub trait TaskOrchestrator: Send + Sync {
    /// Orchestrator name used in logs and diagnostics.
    fn name(&self) -> &str;

    async fn run_task(&self, req: &RunTaskRequest) -> Result<RunTaskResponse, CoreError>;
}
