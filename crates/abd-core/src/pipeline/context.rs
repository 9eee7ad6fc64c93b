use std::{fmt, sync::Arc};

use crate::{
    metrics::{MetricsHandle, noop_metrics},
    ports::{BuildQueue, CredentialIssuer, TaskOrchestrator},
};

/// Collaborator handles injected into a [`crate::Pipeline`].
///
/// Constructed explicitly by the caller; cheap to clone and shared by concurrent activations.
#[derive(Clone)]
pub struct DispatchContext {
    queue: Arc<dyn BuildQueue>,
    issuer: Arc<dyn CredentialIssuer>,
    orchestrator: Arc<dyn TaskOrchestrator>,
    dead_letter: Option<Arc<dyn BuildQueue>>,
    metrics: MetricsHandle,
}

impl DispatchContext {
    /// Create a context with no dead-letter queue and no-op metrics.
    pub fn new(
        queue: Arc<dyn BuildQueue>,
        issuer: Arc<dyn CredentialIssuer>,
        orchestrator: Arc<dyn TaskOrchestrator>,
    ) -> Self {
        Self {
            queue,
            issuer,
            orchestrator,
            dead_letter: None,
            metrics: noop_metrics(),
        }
    }

    pub fn queue(&self) -> &dyn BuildQueue {
        self.queue.as_ref()
    }

    pub fn issuer(&self) -> &dyn CredentialIssuer {
        self.issuer.as_ref()
    }

    pub fn orchestrator(&self) -> &dyn TaskOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn dead_letter(&self) -> Option<&dyn BuildQueue> {
        self.dead_letter.as_deref()
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Attach a dead-letter queue and return updated context.
    pub fn with_dead_letter(mut self, queue: Arc<dyn BuildQueue>) -> Self {
        self.dead_letter = Some(queue);
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("queue", &self.queue.name())
            .field("orchestrator", &self.orchestrator.name())
            .field("dead_letter", &self.dead_letter.as_ref().map(|q| q.name()))
            .field("metrics", &"<handle>")
            .finish()
    }
}

impl fmt::Display for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DispatchContext(queue={}, orchestrator={})",
            self.queue.name(),
            self.orchestrator.name()
        )
    }
}
