use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use abd_model::ActivationEvent;

/// Run one build-dispatch activation against the local backends.
#[derive(Parser, Debug)]
#[command(name = "abd-dispatchd", version, about, long_about = None)]
pub struct Cli {
    /// TOML file with `[dispatch]`, `[logger]` and `[local]` tables.
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Activation event as inline JSON.
    #[arg(long, conflicts_with = "event_file")]
    pub event: Option<String>,

    /// Read the activation event from a JSON file.
    #[arg(long)]
    pub event_file: Option<PathBuf>,

    /// Print the Prometheus text exposition after the activation.
    #[arg(long)]
    pub print_metrics: bool,
}

impl Cli {
    /// Activation event selected on the command line; empty when none was given.
    pub fn activation_event(&self) -> anyhow::Result<ActivationEvent> {
        let raw = match (&self.event, &self.event_file) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading event file {}", path.display()))?,
            (None, None) => return Ok(ActivationEvent::empty()),
        };
        serde_json::from_str(&raw).context("parsing activation event")
    }
}
