//! The dispatch steps, in pipeline order.
//!
//! Each step is a function of (collaborator, config, current state) that returns the
//! next state or a [`crate::DispatchError`]. None of them retries or rolls back.
pub mod acknowledge;
pub mod dead_letter;
pub mod dequeue;
pub mod enqueue;
pub mod launch;
pub mod scope;

pub use acknowledge::acknowledge;
pub use dead_letter::forward_to_dead_letter;
pub use dequeue::{dequeue, lease_message, parse_lease};
pub use enqueue::enqueue;
pub use launch::{launch_task, run_task_request};
pub use scope::{assume_role_request, scope_credentials};
