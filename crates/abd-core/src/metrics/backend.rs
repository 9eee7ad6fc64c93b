use std::sync::Arc;

use crate::error::Stage;

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the end of one activation.
    ///
    /// # Arguments
    /// - `outcome`: `"idle"`, `"dispatched"`, `"dead_lettered"` or `"failed"`
    fn record_activation(&self, outcome: &str);
    /// Record a stage that completed successfully.
    ///
    /// # Arguments
    /// - `stage`: Pipeline stage
    /// - `duration_ms`: Time spent waiting on the collaborator
    fn record_stage_duration(&self, stage: Stage, duration_ms: u64);
    /// Record a stage that aborted the activation.
    fn record_stage_failure(&self, stage: Stage);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
