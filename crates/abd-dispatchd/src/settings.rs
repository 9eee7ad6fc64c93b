use std::{collections::HashMap, path::Path};

use anyhow::Context;
use serde::Deserialize;

use abd_core::DispatchConfig;
use abd_exec::subprocess::LocalTemplate;
use abd_observe::LoggerConfig;

/// Contents of the daemon config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dispatch: DispatchConfig,
    pub logger: LoggerConfig,
    pub local: LocalSettings,
}

/// Local backend wiring.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    /// Name of the in-memory build queue.
    pub queue: String,
    /// Name of the in-memory dead-letter queue; created only when dead-lettering is on.
    pub dead_letter_queue: String,
    /// Raw message bodies stored in the queue before the activation runs.
    pub pending: Vec<String>,
    /// Task template id to command line.
    pub templates: HashMap<String, LocalTemplate>,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            queue: "addon-builds".to_string(),
            dead_letter_queue: "addon-builds-dead".to_string(),
            pending: Vec::new(),
            templates: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(raw)?;
        settings.dispatch.validate()?;
        Ok(settings)
    }
}
