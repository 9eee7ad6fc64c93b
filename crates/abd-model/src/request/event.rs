use serde::{Deserialize, Serialize};

use crate::{BuildRequest, ModelResult};

/// Payload of one pipeline activation.
///
/// Triggers may send arbitrary JSON; only the three build fields are read and
/// everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ember_version: Option<String>,
}

impl ActivationEvent {
    /// Event that carries no build request.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Event carrying a full build request.
    pub fn for_request(req: &BuildRequest) -> Self {
        Self {
            addon: Some(req.addon.clone()),
            addon_version: Some(req.addon_version.clone()),
            ember_version: Some(req.ember_version.clone()),
        }
    }

    /// Extract the build request carried by this event.
    ///
    /// - `Ok(None)` if any of the three fields is absent;
    /// - `Err(..)` if all are present but fail [`BuildRequest::validate`];
    /// - `Ok(Some(..))` otherwise.
    pub fn build_request(&self) -> ModelResult<Option<BuildRequest>> {
        let (Some(addon), Some(addon_version), Some(ember_version)) =
            (&self.addon, &self.addon_version, &self.ember_version)
        else {
            return Ok(None);
        };
        let req = BuildRequest::new(addon, addon_version, ember_version);
        req.validate()?;
        Ok(Some(req))
    }
}
