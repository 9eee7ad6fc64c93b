use async_trait::async_trait;
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use abd_core::{AssumeRoleRequest, CoreError, CredentialIssuer};
use abd_model::{SESSION_DURATION_SECS, ScopedCredentials};

/// Longest session a role assumption may request.
const MAX_SESSION_SECS: u32 = 43_200;

/// Issuer that mints random session credentials without a remote service.
///
/// Requests are checked the way a token service checks them: a role is named,
/// the inline policy parses and carries `Version` and a non-empty `Statement`,
/// and the duration lies in the accepted range. The issued session lasts exactly
/// the requested duration.
#[derive(Debug, Default)]
pub struct LocalIssuer {
    last_policy: Mutex<Option<String>>,
}

impl LocalIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy attached to the most recent successful assumption.
    pub async fn last_policy(&self) -> Option<String> {
        self.last_policy.lock().await.clone()
    }

    fn check(req: &AssumeRoleRequest) -> Result<(), CoreError> {
        if req.role_arn.trim().is_empty() {
            return Err(CoreError::Rejected("role arn is empty".into()));
        }
        if req.session_name.trim().is_empty() {
            return Err(CoreError::Rejected("session name is empty".into()));
        }
        if !(SESSION_DURATION_SECS..=MAX_SESSION_SECS).contains(&req.duration_secs) {
            return Err(CoreError::Rejected(format!(
                "duration {}s outside {SESSION_DURATION_SECS}..={MAX_SESSION_SECS}",
                req.duration_secs
            )));
        }

        let doc: Value = serde_json::from_str(&req.policy)
            .map_err(|e| CoreError::Rejected(format!("malformed policy: {e}")))?;
        if doc.get("Version").and_then(Value::as_str).is_none() {
            return Err(CoreError::Rejected("policy has no Version".into()));
        }
        match doc.get("Statement").and_then(Value::as_array) {
            Some(stmts) if !stmts.is_empty() => Ok(()),
            _ => Err(CoreError::Rejected("policy has no Statement".into())),
        }
    }
}

#[async_trait]
impl CredentialIssuer for LocalIssuer {
    async fn assume_role(&self, req: &AssumeRoleRequest) -> Result<ScopedCredentials, CoreError> {
        Self::check(req)?;

        let issued_at = OffsetDateTime::now_utc();
        let expiration = issued_at + Duration::seconds(i64::from(req.duration_secs));
        let key = Uuid::new_v4().simple().to_string().to_uppercase();
        let creds = ScopedCredentials::new(
            format!("ASIA{}", &key[..16]),
            Uuid::new_v4().simple().to_string(),
            Uuid::new_v4().to_string(),
            issued_at,
            expiration,
        );

        *self.last_policy.lock().await = Some(req.policy.clone());
        debug!(
            role = %req.role_arn,
            session = %req.session_name,
            duration_secs = req.duration_secs,
            "session issued"
        );
        Ok(creds)
    }
}
