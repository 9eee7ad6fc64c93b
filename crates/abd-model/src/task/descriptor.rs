use std::fmt;

use serde::{Deserialize, Serialize};

/// Task reported as started by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Orchestrator-assigned task identifier.
    pub task_arn: String,
    /// Template the task was started from.
    pub task_definition: String,
    /// Cluster the task runs on.
    pub cluster: String,
    /// Last status reported at launch time (e.g. `PROVISIONING`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    /// Value of the `started_by` tag recorded on the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} on {})",
            self.task_arn, self.task_definition, self.cluster
        )
    }
}

/// Failure entry reported by the orchestrator instead of a started task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchFailure {
    /// Resource the failure refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    /// Orchestrator-provided reason (e.g. `RESOURCE:MEMORY`).
    pub reason: String,
}

impl LaunchFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            arn: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LaunchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arn {
            Some(arn) => write!(f, "{} ({arn})", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}
