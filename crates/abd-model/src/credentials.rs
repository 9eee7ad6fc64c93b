use std::fmt;

use time::{Duration, OffsetDateTime};

use crate::{
    ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SESSION_TOKEN, Env, SESSION_DURATION_SECS,
};

/// Time-boxed credential set scoped to a single build.
///
/// Never reused across leases. `Debug` and `Display` redact the secret parts.
#[derive(Clone, PartialEq, Eq)]
pub struct ScopedCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    issued_at: OffsetDateTime,
    expiration: OffsetDateTime,
}

impl ScopedCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        issued_at: OffsetDateTime,
        expiration: OffsetDateTime,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            issued_at,
            expiration,
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn issued_at(&self) -> OffsetDateTime {
        self.issued_at
    }

    pub fn expiration(&self) -> OffsetDateTime {
        self.expiration
    }

    /// Time between issuance and expiry.
    pub fn lifetime(&self) -> Duration {
        self.expiration - self.issued_at
    }

    /// Returns `true` if the lifetime is exactly the fixed session duration.
    pub fn has_session_lifetime(&self) -> bool {
        self.lifetime() == Duration::seconds(i64::from(SESSION_DURATION_SECS))
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expiration
    }

    /// The three credential variables, in the order they are injected.
    pub fn to_env(&self) -> Env {
        let mut env = Env::new();
        env.push(ENV_ACCESS_KEY_ID, self.access_key_id.as_str());
        env.push(ENV_SECRET_ACCESS_KEY, self.secret_access_key.as_str());
        env.push(ENV_SESSION_TOKEN, self.session_token.as_str());
        env
    }
}

impl fmt::Debug for ScopedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl fmt::Display for ScopedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScopedCredentials(key_id={}, expires={})",
            self.access_key_id, self.expiration
        )
    }
}
