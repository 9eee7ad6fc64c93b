use crate::{error::Stage, metrics::backend::MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_activation(&self, _: &str) {}

    #[inline(always)]
    fn record_stage_duration(&self, _: Stage, _: u64) {}

    #[inline(always)]
    fn record_stage_failure(&self, _: Stage) {}
}
