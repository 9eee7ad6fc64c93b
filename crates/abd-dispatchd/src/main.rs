mod cli;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use abd_core::{BuildQueue, DispatchContext, Pipeline};
use abd_exec::{LocalIssuer, MemoryQueue, subprocess::SubprocessOrchestrator};
use abd_observe::{LoggerTimeZone, init_local_offset, init_logger};
use abd_model::ActivationEvent;
use abd_prometheus::PrometheusMetrics;

use crate::{cli::Cli, settings::Settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;
    let event = cli.activation_event()?;

    // Local offset detection only works before the runtime spawns threads.
    if settings.logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    init_logger(&settings.logger)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building runtime")?
        .block_on(run(cli, settings, event))
}

async fn run(cli: Cli, settings: Settings, event: ActivationEvent) -> anyhow::Result<()> {
    let Settings { dispatch, local, .. } = settings;

    // 1) queue, seeded with pending bodies
    let queue = Arc::new(MemoryQueue::new(local.queue));
    for body in &local.pending {
        queue.enqueue(body).await?;
    }
    debug!(queue = queue.name(), depth = queue.len().await, "queue ready");

    // 2) collaborators
    let orchestrator = SubprocessOrchestrator::new("subprocess", local.templates)?;
    let metrics = Arc::new(PrometheusMetrics::new()?);
    let mut ctx = DispatchContext::new(
        queue.clone(),
        Arc::new(LocalIssuer::new()),
        Arc::new(orchestrator),
    )
    .with_metrics(metrics.clone());
    if dispatch.dead_letter.max_receives.is_some() {
        ctx = ctx.with_dead_letter(Arc::new(MemoryQueue::new(local.dead_letter_queue)));
    }

    // 3) one activation
    let pipeline = Pipeline::new(dispatch, ctx)?;
    let result = pipeline.run(&event).await;

    if cli.print_metrics
        && let Some(text) = rendered_metrics(metrics.render())
    {
        print!("{text}");
    }
    let outcome = result?;
    info!(outcome = %outcome, remaining = queue.len().await, "dispatcher done");
    Ok(())
}

/// Metrics output is best effort; the activation result decides the exit status.
fn rendered_metrics<E: std::fmt::Display>(rendered: Result<String, E>) -> Option<String> {
    match rendered {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "rendering metrics failed");
            None
        }
    }
}
