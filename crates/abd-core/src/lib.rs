pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod ports;
pub mod steps;

pub use config::{DeadLetterPolicy, DispatchConfig};
pub use error::{ConfigError, CoreError, DispatchError, Stage};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};
pub use pipeline::{DispatchContext, DispatchOutcome, Pipeline};
pub use ports::{
    AssumeRoleRequest, BuildQueue, ContainerOverride, CredentialIssuer, QueueMessage,
    RunTaskRequest, RunTaskResponse, TaskOrchestrator,
};

#[cfg(test)]
pub(crate) mod testing;
