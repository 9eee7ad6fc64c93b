use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Identifier journald entries are tagged with unless configured otherwise.
pub const DEFAULT_IDENTIFIER: &str = "abd-dispatchd";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"abd_core=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone of text and JSON timestamps.
    pub tz: LoggerTimeZone,
    /// Include module targets in log lines.
    pub with_targets: bool,
    /// Colored text output; only honored when stdout is a terminal.
    pub use_color: bool,
    /// Syslog identifier for journald entries.
    pub identifier: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
            identifier: DEFAULT_IDENTIFIER.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Whether ANSI colors should be emitted right now.
    ///
    /// Checked at init time, so redirecting stdout to a file or pipe turns colors off.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
        assert_eq!(config.identifier, DEFAULT_IDENTIFIER);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.format, LoggerFormat::Text);
    }

    #[test]
    fn reads_logger_table() {
        let toml = r#"
            format = "json"
            level = "abd_core=debug,info"
            tz = "local"
            use_color = false
        "#;
        let config: LoggerConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "abd_core=debug,info");
        assert_eq!(config.tz, LoggerTimeZone::Local);
        assert!(!config.use_color);
        assert!(config.with_targets);
    }

    #[test]
    fn rejects_bad_level_in_table() {
        let err = toml::from_str::<LoggerConfig>(r#"level = "abd_core=loud""#);
        assert!(err.is_err());
    }
}
