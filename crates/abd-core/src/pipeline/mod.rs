//! The dispatch pipeline: enqueue → lease → scope credentials → launch → acknowledge.
//!
//! One [`Pipeline::run`] call is one activation. Steps run strictly one after the
//! other; the first failure aborts the rest and is returned as a [`DispatchError`].
//! Nothing is retried or rolled back here: retries happen by a later activation
//! leasing the message again once its visibility timeout expires.
mod context;
pub use context::DispatchContext;

mod outcome;
pub use outcome::DispatchOutcome;

use std::{future::Future, time::Instant};

use tracing::{error, info, instrument};

use abd_model::ActivationEvent;

use crate::{
    config::DispatchConfig,
    error::{ConfigError, DispatchError, Stage},
    steps,
};

/// Validated configuration plus collaborator handles.
///
/// `Pipeline` is `Send + Sync`; concurrent activations may share one instance.
#[derive(Debug, Clone)]
pub struct Pipeline {
    cfg: DispatchConfig,
    ctx: DispatchContext,
}

impl Pipeline {
    /// Create a pipeline after validating `cfg` against `ctx`.
    ///
    /// A dead-letter budget requires a dead-letter queue in the context.
    pub fn new(cfg: DispatchConfig, ctx: DispatchContext) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if cfg.dead_letter.max_receives.is_some() && ctx.dead_letter().is_none() {
            return Err(ConfigError::Missing("dead-letter queue"));
        }
        Ok(Self { cfg, ctx })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.cfg
    }

    pub fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    /// Run one activation.
    ///
    /// This is the single catch point: every failure is logged and recorded here
    /// before being returned to the trigger.
    #[instrument(level = "info", skip(self, event), fields(env = %self.cfg.env))]
    pub async fn run(&self, event: &ActivationEvent) -> Result<DispatchOutcome, DispatchError> {
        info!(event = ?event, "starting activation");
        let metrics = self.ctx.metrics();

        let result = self.run_steps(event).await;
        match &result {
            Ok(outcome) => {
                metrics.record_activation(outcome.as_label());
                info!(outcome = %outcome, "activation finished");
            }
            Err(e) => {
                metrics.record_stage_failure(e.stage());
                metrics.record_activation("failed");
                error!(
                    stage = %e.stage(),
                    error = %e,
                    started_tasks = ?e.started_tasks(),
                    "activation aborted"
                );
            }
        }
        result
    }

    async fn run_steps(&self, event: &ActivationEvent) -> Result<DispatchOutcome, DispatchError> {
        let queue = self.ctx.queue();

        let enqueued = self
            .timed(Stage::Enqueue, steps::enqueue(queue, event))
            .await?;

        let leased = self
            .timed(
                Stage::Dequeue,
                steps::lease_message(queue, self.cfg.visibility_timeout()),
            )
            .await?;
        let Some(msg) = leased else {
            return Ok(DispatchOutcome::Idle { enqueued });
        };

        // `Pipeline::new` guarantees a dead-letter queue whenever a budget is set.
        if self.cfg.dead_letter.exceeded(msg.receive_count)
            && let Some(dead_letter) = self.ctx.dead_letter()
        {
            self.timed(
                Stage::DeadLetter,
                steps::forward_to_dead_letter(queue, dead_letter, &msg),
            )
            .await?;
            return Ok(DispatchOutcome::DeadLettered {
                enqueued,
                receipt: msg.receipt,
                receive_count: msg.receive_count,
            });
        }

        let lease = steps::parse_lease(msg)?;
        let lease = self
            .timed(
                Stage::Scope,
                steps::scope_credentials(self.ctx.issuer(), &self.cfg, lease),
            )
            .await?;
        let lease = self
            .timed(
                Stage::Launch,
                steps::launch_task(self.ctx.orchestrator(), &self.cfg, lease),
            )
            .await?;

        let request = lease.request().clone();
        let task = self
            .timed(Stage::Acknowledge, steps::acknowledge(queue, lease))
            .await?;

        Ok(DispatchOutcome::Dispatched {
            enqueued,
            request,
            task,
        })
    }

    async fn timed<T, F>(&self, stage: Stage, step: F) -> Result<T, DispatchError>
    where
        F: Future<Output = Result<T, DispatchError>>,
    {
        let started = Instant::now();
        let out = step.await;
        if out.is_ok() {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            self.ctx.metrics().record_stage_duration(stage, elapsed_ms);
        }
        out
    }
}
