use std::{fmt, path::PathBuf};

use serde::Deserialize;

use crate::ExecError;

/// Command line registered for one task template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalTemplate {
    /// Command to execute (e.g. `"make"`, `"/usr/local/bin/build-addon"`).
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory; the parent's one when `None`.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl LocalTemplate {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Rules:
    /// - `command` is not empty or whitespace-only.
    pub fn validate(&self, template: &str) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidTemplate {
                template: template.to_string(),
                reason: "command is empty".into(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for LocalTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalTemplate(cmd='{}', args={}, cwd={:?})", self.command, self.args.len(), self.cwd)
    }
}
