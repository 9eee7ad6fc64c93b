mod domain;
pub use domain::{
    ENV_ACCESS_KEY_ID, ENV_ADDON_NAME, ENV_ADDON_VERSION, ENV_SECRET_ACCESS_KEY,
    ENV_SESSION_TOKEN, POLICY_VERSION, SESSION_DURATION_SECS,
};
pub use domain::{Env, KeyValue};

mod error;
pub use error::{ModelError, ModelResult};

mod request;
pub use request::{ActivationEvent, BuildRequest};

mod lease;
pub use lease::{LeaseReceipt, LeasedBuild};

mod credentials;
pub use credentials::ScopedCredentials;

mod policy;
pub use policy::{AccessPolicy, Effect, PolicyStatement, PolicyTarget};

mod task;
pub use task::{LaunchFailure, TaskDescriptor, task_template_id};
