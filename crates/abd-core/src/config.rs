use std::time::Duration;

use serde::{Deserialize, Serialize};

use abd_model::PolicyTarget;

use crate::error::ConfigError;

/// Dispatch pipeline configuration.
///
/// Every deployment-specific name lives here rather than in the steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Deployment environment name, logged on every activation.
    pub env: String,
    /// Role assumed for every build session.
    pub builder_role: String,
    /// Constant session name used when assuming `builder_role`.
    pub session_name: String,
    /// ARN of the processing function builds may invoke.
    pub function_arn: String,
    /// Bucket holding build artifacts.
    pub bucket: String,
    /// Prefix of the per-runtime task templates.
    pub template_prefix: String,
    /// Cluster every build task is started on.
    pub cluster: String,
    /// Container inside the template that receives the environment overrides.
    pub container_name: String,
    /// Tag recorded on started tasks.
    pub started_by: String,
    /// Visibility timeout for a lease, in seconds.
    ///
    /// Short on purpose: an aborted activation releases the message quickly.
    pub visibility_timeout_secs: u64,
    /// Poison-message handling.
    pub dead_letter: DeadLetterPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            builder_role: String::new(),
            session_name: "build-addon".to_string(),
            function_arn: String::new(),
            bucket: String::new(),
            template_prefix: "addon-builder".to_string(),
            cluster: "ember-twiddle".to_string(),
            container_name: "addon-builder".to_string(),
            started_by: "ember-twiddle-scheduler".to_string(),
            visibility_timeout_secs: 5,
            dead_letter: DeadLetterPolicy::default(),
        }
    }
}

impl DispatchConfig {
    /// Validate the configuration.
    ///
    /// Rules:
    /// - all names used by the steps are non-empty;
    /// - `visibility_timeout_secs` is in `1..=43200`;
    /// - `dead_letter.max_receives`, when set, is at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("builder_role", &self.builder_role),
            ("session_name", &self.session_name),
            ("function_arn", &self.function_arn),
            ("bucket", &self.bucket),
            ("template_prefix", &self.template_prefix),
            ("cluster", &self.cluster),
            ("container_name", &self.container_name),
            ("started_by", &self.started_by),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(field));
            }
        }
        if !(1..=43_200).contains(&self.visibility_timeout_secs) {
            return Err(ConfigError::Invalid {
                field: "visibility_timeout_secs",
                reason: format!("{} is outside 1..=43200", self.visibility_timeout_secs),
            });
        }
        if self.dead_letter.max_receives == Some(0) {
            return Err(ConfigError::Invalid {
                field: "dead_letter.max_receives",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }

    /// Fixed resources referenced by every generated policy.
    pub fn policy_target(&self) -> PolicyTarget {
        PolicyTarget {
            function_arn: self.function_arn.clone(),
            bucket: self.bucket.clone(),
        }
    }
}

/// What to do with a message that keeps coming back.
///
/// Disabled by default: without it a message is only ever deleted after its task started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadLetterPolicy {
    /// Deliveries allowed before the message is moved to the dead-letter queue.
    pub max_receives: Option<u32>,
}

impl DeadLetterPolicy {
    /// Returns `true` if a delivery with `receive_count` should be dead-lettered.
    pub fn exceeded(&self, receive_count: u32) -> bool {
        matches!(self.max_receives, Some(max) if receive_count > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DispatchConfig {
        DispatchConfig {
            builder_role: "arn:aws:iam::123456789012:role/addon-builder".into(),
            function_arn: "arn:aws:lambda:us-east-1:123456789012:function:process".into(),
            bucket: "addon-builds".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = DispatchConfig::default();
        assert_eq!(cfg.cluster, "ember-twiddle");
        assert_eq!(cfg.session_name, "build-addon");
        assert_eq!(cfg.container_name, "addon-builder");
        assert_eq!(cfg.started_by, "ember-twiddle-scheduler");
        assert_eq!(cfg.visibility_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.dead_letter.max_receives, None);
    }

    #[test]
    fn default_requires_deployment_names() {
        let err = DispatchConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("builder_role")));
        valid().validate().unwrap();
    }

    #[test]
    fn rejects_zero_visibility_timeout() {
        let cfg = DispatchConfig {
            visibility_timeout_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_max_receives() {
        let cfg = DispatchConfig {
            dead_letter: DeadLetterPolicy {
                max_receives: Some(0),
            },
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn dead_letter_threshold_is_exclusive() {
        let p = DeadLetterPolicy {
            max_receives: Some(3),
        };
        assert!(!p.exceeded(3));
        assert!(p.exceeded(4));
        assert!(!DeadLetterPolicy::default().exceeded(u32::MAX));
    }

    #[test]
    fn toml_uses_defaults_for_missing_fields() {
        let cfg: DispatchConfig = toml::from_str(
            r#"
            builder_role = "role"
            cluster = "staging"

            [dead_letter]
            max_receives = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cluster, "staging");
        assert_eq!(cfg.session_name, "build-addon");
        assert_eq!(cfg.dead_letter.max_receives, Some(5));
    }
}
