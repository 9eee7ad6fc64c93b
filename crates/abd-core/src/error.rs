use std::fmt;

use thiserror::Error;

use abd_model::{BuildRequest, LaunchFailure, LeaseReceipt, ModelError, TaskDescriptor};

/// Error reported by an external collaborator (queue, issuer, orchestrator).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("lease receipt is no longer valid: {0}")]
    InvalidReceipt(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Enqueue,
    Dequeue,
    DeadLetter,
    Scope,
    Launch,
    Acknowledge,
}

impl Stage {
    /// Return label value for logs and metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Stage::Enqueue => "enqueue",
            Stage::Dequeue => "dequeue",
            Stage::DeadLetter => "dead_letter",
            Stage::Scope => "scope",
            Stage::Launch => "launch",
            Stage::Acknowledge => "acknowledge",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Terminal failure of one pipeline activation.
///
/// Every variant maps to the [`Stage`] that aborted; nothing after it ran.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to enqueue {request}: {source}")]
    Enqueue {
        request: BuildRequest,
        source: CoreError,
    },

    #[error("failed to lease from queue: {0}")]
    Dequeue(#[source] CoreError),

    #[error("malformed queue message (receipt {receipt}): {source}")]
    MalformedMessage {
        receipt: LeaseReceipt,
        source: ModelError,
    },

    #[error("failed to forward message {receipt} to dead-letter queue: {source}")]
    DeadLetter {
        receipt: LeaseReceipt,
        source: CoreError,
    },

    #[error("failed to scope credentials for {request}: {source}")]
    Scope {
        request: BuildRequest,
        source: CoreError,
    },

    #[error("credentials for {request} live {lifetime_secs}s, expected exactly {expected_secs}s")]
    CredentialLifetime {
        request: BuildRequest,
        lifetime_secs: i64,
        expected_secs: u32,
    },

    #[error("failed to run task for {request}: {source}")]
    Launch {
        request: BuildRequest,
        source: CoreError,
    },

    #[error("starting task failed for {request}: {failure}")]
    LaunchRejected {
        request: BuildRequest,
        failure: LaunchFailure,
        /// Tasks the orchestrator reported started alongside the failure.
        started: Vec<TaskDescriptor>,
    },

    #[error("orchestrator reported no started task for {request}")]
    NoTaskStarted { request: BuildRequest },

    #[error("task {task} started but acknowledging {receipt} failed: {source}")]
    Acknowledge {
        task: TaskDescriptor,
        receipt: LeaseReceipt,
        source: CoreError,
    },
}

impl DispatchError {
    /// Stage that aborted the activation.
    pub fn stage(&self) -> Stage {
        match self {
            DispatchError::Enqueue { .. } => Stage::Enqueue,
            DispatchError::Dequeue(_) | DispatchError::MalformedMessage { .. } => Stage::Dequeue,
            DispatchError::DeadLetter { .. } => Stage::DeadLetter,
            DispatchError::Scope { .. } | DispatchError::CredentialLifetime { .. } => Stage::Scope,
            DispatchError::Launch { .. }
            | DispatchError::LaunchRejected { .. }
            | DispatchError::NoTaskStarted { .. } => Stage::Launch,
            DispatchError::Acknowledge { .. } => Stage::Acknowledge,
        }
    }

    /// Tasks known to be running even though the activation failed.
    pub fn started_tasks(&self) -> &[TaskDescriptor] {
        match self {
            DispatchError::Acknowledge { task, .. } => std::slice::from_ref(task),
            DispatchError::LaunchRejected { started, .. } => started,
            _ => &[],
        }
    }
}

/// Invalid [`crate::DispatchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing config value: {0}")]
    Missing(&'static str),

    #[error("invalid config value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskDescriptor {
        TaskDescriptor {
            task_arn: "arn:task/1".into(),
            task_definition: "builder-3-2-0".into(),
            cluster: "ember-twiddle".into(),
            last_status: None,
            started_by: None,
        }
    }

    #[test]
    fn acknowledge_error_keeps_started_task() {
        let err = DispatchError::Acknowledge {
            task: task(),
            receipt: "r-1".into(),
            source: CoreError::Transport("timeout".into()),
        };
        assert_eq!(err.stage(), Stage::Acknowledge);
        assert_eq!(err.started_tasks(), &[task()]);
        assert!(err.to_string().contains("arn:task/1"));
    }

    #[test]
    fn launch_rejection_reports_failure_reason() {
        let err = DispatchError::LaunchRejected {
            request: BuildRequest::new("foo", "1.0.0", "3.2.0"),
            failure: LaunchFailure::new("RESOURCE:MEMORY"),
            started: Vec::new(),
        };
        assert_eq!(err.stage(), Stage::Launch);
        assert!(err.started_tasks().is_empty());
        assert!(err.to_string().contains("RESOURCE:MEMORY"));
    }

    #[test]
    fn stage_labels_are_stable() {
        assert_eq!(Stage::Enqueue.to_string(), "enqueue");
        assert_eq!(Stage::DeadLetter.as_label(), "dead_letter");
        assert_eq!(Stage::Acknowledge.as_label(), "acknowledge");
    }
}
