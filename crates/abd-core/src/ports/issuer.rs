use async_trait::async_trait;
use serde::Serialize;

use abd_model::ScopedCredentials;

use crate::error::CoreError;

/// Parameters of one role assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumeRoleRequest {
    /// Role the build assumes.
    pub role_arn: String,
    /// Constant session name.
    pub session_name: String,
    /// Requested session lifetime in seconds.
    pub duration_secs: u32,
    /// JSON policy document narrowing the role's permissions.
    pub policy: String,
}

/// Temporary-credential issuer.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Assume `req.role_arn` with `req.policy` as an additional permission boundary.
    async fn assume_role(&self, req: &AssumeRoleRequest) -> Result<ScopedCredentials, CoreError>;
}
