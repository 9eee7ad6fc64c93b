//! Orchestrator that starts each task as a local OS process.
//!
//! Task templates map a template identifier to a command line; the container
//! environment overrides of a launch become the process environment.
mod orchestrator;
mod template;

pub use orchestrator::SubprocessOrchestrator;
pub use template::LocalTemplate;
