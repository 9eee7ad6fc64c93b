//! Common model-level constants.
//!
//! Well-known environment variable names injected into the build container,
//! plus the fixed parameters of the scoped credential session.

/// Access key id of the scoped credential set.
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Secret key of the scoped credential set.
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Session token of the scoped credential set.
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Name of the addon being built.
pub const ENV_ADDON_NAME: &str = "ADDON_NAME";

/// Version of the addon being built.
pub const ENV_ADDON_VERSION: &str = "ADDON_VERSION";

/// Lifetime of every scoped credential set, in seconds.
///
/// Credentials must never outlive this window.
pub const SESSION_DURATION_SECS: u32 = 900;

/// Policy language version stamped on every generated [`crate::AccessPolicy`].
pub const POLICY_VERSION: &str = "2012-10-17";
