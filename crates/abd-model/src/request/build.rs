use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// Request to build one addon version against one runtime version.
///
/// Serialized verbatim as the queue message body:
/// `{"addon": "...", "addon_version": "...", "ember_version": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Addon (package) name.
    pub addon: String,
    /// Addon version to build.
    pub addon_version: String,
    /// Dotted runtime version the addon is built against (e.g. `"3.2.0"`).
    pub ember_version: String,
}

impl BuildRequest {
    /// Create a new request without validating it.
    pub fn new(
        addon: impl Into<String>,
        addon_version: impl Into<String>,
        ember_version: impl Into<String>,
    ) -> Self {
        Self {
            addon: addon.into(),
            addon_version: addon_version.into(),
            ember_version: ember_version.into(),
        }
    }

    /// Validate that the fields address exactly one artifact directory.
    ///
    /// Rules (per path segment):
    /// - not empty;
    /// - no `/`, `*`, `?`, `$` or whitespace/control characters;
    /// - not `.` and no `..` sequence.
    ///
    /// `addon_version` and `ember_version` are one segment each. `addon` is one
    /// segment, or two for a scoped package (`@scope/name`).
    ///
    /// A field violating these would widen the object prefix of the generated policy.
    pub fn validate(&self) -> ModelResult<()> {
        check_addon(&self.addon)?;
        check_segment("addon_version", &self.addon_version)?;
        check_segment("ember_version", &self.ember_version)?;
        Ok(())
    }

    /// Object key prefix owned by this build: `ember-<ember>/<addon>/<version>/`.
    pub fn artifact_prefix(&self) -> String {
        format!(
            "ember-{}/{}/{}/",
            self.ember_version, self.addon, self.addon_version
        )
    }

    /// Encode as a queue message body.
    pub fn to_body(&self) -> ModelResult<String> {
        serde_json::to_string(self).map_err(|e| ModelError::Encode(e.to_string()))
    }

    /// Decode from a queue message body.
    pub fn from_body(body: &str) -> ModelResult<Self> {
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))
    }
}

impl fmt::Display for BuildRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} (ember {})",
            self.addon, self.addon_version, self.ember_version
        )
    }
}

/// Scoped packages carry exactly one `/` between a `@scope` and a name segment.
fn check_addon(value: &str) -> ModelResult<()> {
    match value.split_once('/') {
        Some((scope, name)) if scope.starts_with('@') => {
            if scope.len() == 1 {
                return Err(ModelError::InvalidField {
                    field: "addon",
                    reason: "empty package scope".into(),
                });
            }
            check_segment("addon", scope)?;
            check_segment("addon", name)
        }
        _ => check_segment("addon", value),
    }
}

fn check_segment(field: &'static str, value: &str) -> ModelResult<()> {
    if value.is_empty() {
        return Err(ModelError::MissingField(field));
    }
    let invalid = |reason: &str| ModelError::InvalidField {
        field,
        reason: reason.to_string(),
    };
    if value == "." || value.contains("..") {
        return Err(invalid("relative path segment"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '*' | '?' | '$') || c.is_whitespace() || c.is_control())
    {
        return Err(invalid(&format!("forbidden character {c:?}")));
    }
    Ok(())
}
