use std::fmt;

use abd_model::{BuildRequest, LeaseReceipt, TaskDescriptor};

/// Successful end of one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The queue had nothing to lease; no credentials, launch or ack happened.
    Idle { enqueued: Option<BuildRequest> },
    /// A build task was started and its message deleted.
    Dispatched {
        enqueued: Option<BuildRequest>,
        request: BuildRequest,
        task: TaskDescriptor,
    },
    /// The leased message exceeded its delivery budget and was dead-lettered.
    DeadLettered {
        enqueued: Option<BuildRequest>,
        receipt: LeaseReceipt,
        receive_count: u32,
    },
}

impl DispatchOutcome {
    /// Return label value for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchOutcome::Idle { .. } => "idle",
            DispatchOutcome::Dispatched { .. } => "dispatched",
            DispatchOutcome::DeadLettered { .. } => "dead_lettered",
        }
    }

    /// Request pushed by this activation, if its event carried one.
    pub fn enqueued(&self) -> Option<&BuildRequest> {
        match self {
            DispatchOutcome::Idle { enqueued }
            | DispatchOutcome::Dispatched { enqueued, .. }
            | DispatchOutcome::DeadLettered { enqueued, .. } => enqueued.as_ref(),
        }
    }

    /// Task started by this activation.
    pub fn task(&self) -> Option<&TaskDescriptor> {
        match self {
            DispatchOutcome::Dispatched { task, .. } => Some(task),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Idle { .. } => f.write_str("idle"),
            DispatchOutcome::Dispatched { request, task, .. } => {
                write!(f, "dispatched {request} as {task}")
            }
            DispatchOutcome::DeadLettered {
                receipt,
                receive_count,
                ..
            } => write!(f, "dead-lettered {receipt} after {receive_count} deliveries"),
        }
    }
}
