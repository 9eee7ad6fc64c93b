use tracing::{debug, info};

use abd_model::{AccessPolicy, BuildRequest, LeasedBuild, SESSION_DURATION_SECS};

use crate::{
    config::DispatchConfig,
    error::DispatchError,
    ports::{AssumeRoleRequest, CredentialIssuer},
};

/// Build the role assumption for one request.
///
/// The attached policy is generated fresh and only grants the request's own artifact prefix.
pub fn assume_role_request(
    cfg: &DispatchConfig,
    request: &BuildRequest,
) -> Result<AssumeRoleRequest, DispatchError> {
    let to_err = |e: abd_model::ModelError| DispatchError::Scope {
        request: request.clone(),
        source: e.into(),
    };
    let policy = AccessPolicy::for_build(request, &cfg.policy_target()).map_err(to_err)?;
    let policy = policy.to_json().map_err(to_err)?;

    Ok(AssumeRoleRequest {
        role_arn: cfg.builder_role.clone(),
        session_name: cfg.session_name.clone(),
        duration_secs: SESSION_DURATION_SECS,
        policy,
    })
}

/// Obtain single-use credentials for the leased build and attach them.
///
/// Credentials whose lifetime is not exactly the session duration are rejected.
pub async fn scope_credentials(
    issuer: &dyn CredentialIssuer,
    cfg: &DispatchConfig,
    lease: LeasedBuild,
) -> Result<LeasedBuild, DispatchError> {
    let req = assume_role_request(cfg, lease.request())?;
    info!(
        role = %req.role_arn,
        session = %req.session_name,
        prefix = %lease.request().artifact_prefix(),
        "creating scoped credentials"
    );

    let creds = issuer
        .assume_role(&req)
        .await
        .map_err(|source| DispatchError::Scope {
            request: lease.request().clone(),
            source,
        })?;

    if !creds.has_session_lifetime() {
        return Err(DispatchError::CredentialLifetime {
            request: lease.request().clone(),
            lifetime_secs: creds.lifetime().whole_seconds(),
            expected_secs: SESSION_DURATION_SECS,
        });
    }
    debug!(credentials = %creds, "credentials issued");
    Ok(lease.with_credentials(creds))
}
