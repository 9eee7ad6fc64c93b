mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod constants;
pub use constants::{
    ENV_ACCESS_KEY_ID, ENV_ADDON_NAME, ENV_ADDON_VERSION, ENV_SECRET_ACCESS_KEY,
    ENV_SESSION_TOKEN, POLICY_VERSION, SESSION_DURATION_SECS,
};
