mod descriptor;
pub use descriptor::{LaunchFailure, TaskDescriptor};

mod template;
pub use template::task_template_id;
