//! Narrow interfaces to the external collaborators of the dispatch pipeline.
//!
//! Concrete backends implement these traits and are injected through
//! [`crate::DispatchContext`]; the pipeline never constructs them itself.
mod queue;
pub use queue::{BuildQueue, QueueMessage};

mod issuer;
pub use issuer::{AssumeRoleRequest, CredentialIssuer};

mod orchestrator;
pub use orchestrator::{ContainerOverride, RunTaskRequest, RunTaskResponse, TaskOrchestrator};
