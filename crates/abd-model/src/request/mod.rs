mod build;
pub use build::BuildRequest;

mod event;
pub use event::ActivationEvent;
