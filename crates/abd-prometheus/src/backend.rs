use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use abd_core::{MetricsBackend, Stage};

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// - `outcome`: `idle`, `dispatched`, `dead_lettered`, `failed`
/// - `stage`: one per pipeline [`Stage`]
#[derive(Clone)]
pub struct PrometheusMetrics {
    activations: CounterVec,
    stage_failures: CounterVec,
    stage_duration: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create the backend and register its metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let activations = CounterVec::new(
            Opts::new("abd_activations_total", "Pipeline activations by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(activations.clone()))?;

        let stage_failures = CounterVec::new(
            Opts::new("abd_stage_failures_total", "Activations aborted by stage"),
            &["stage"],
        )?;
        registry.register(Box::new(stage_failures.clone()))?;

        // Collaborator calls are network round trips; the tail covers slow launches.
        let stage_duration = HistogramVec::new(
            HistogramOpts::new(
                "abd_stage_duration_seconds",
                "Time spent in successful pipeline stages",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["stage"],
        )?;
        registry.register(Box::new(stage_duration.clone()))?;

        Ok(Self {
            activations,
            stage_failures,
            stage_duration,
            registry,
        })
    }

    /// Create the backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format of all registered metrics.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_activation(&self, outcome: &str) {
        self.activations.with_label_values(&[outcome]).inc();
    }

    fn record_stage_duration(&self, stage: Stage, duration_ms: u64) {
        self.stage_duration
            .with_label_values(&[stage.as_label()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_stage_failure(&self, stage: Stage) {
        self.stage_failures
            .with_label_values(&[stage.as_label()])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn activations_are_counted_per_outcome() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_activation("dispatched");
        metrics.record_activation("dispatched");
        metrics.record_activation("idle");

        let families = metrics.gather();
        assert_eq!(family(&families, "abd_activations_total").get_metric().len(), 2);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"abd_activations_total{outcome="dispatched"} 2"#));
        assert!(text.contains(r#"abd_activations_total{outcome="idle"} 1"#));
    }

    #[test]
    fn stage_metrics_use_stage_labels() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_stage_duration(Stage::Launch, 250);
        metrics.record_stage_duration(Stage::Scope, 40);
        metrics.record_stage_failure(Stage::Acknowledge);

        let families = metrics.gather();
        assert_eq!(family(&families, "abd_stage_duration_seconds").get_metric().len(), 2);
        assert_eq!(family(&families, "abd_stage_failures_total").get_metric().len(), 1);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"abd_stage_failures_total{stage="acknowledge"} 1"#));
        assert!(text.contains(r#"abd_stage_duration_seconds_count{stage="launch"} 1"#));
    }

    #[test]
    fn render_produces_text_exposition() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_activation("failed");

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"abd_activations_total{outcome="failed"} 1"#));
    }

    #[test]
    fn registering_twice_in_one_registry_fails() {
        let registry = Arc::new(Registry::new());
        assert!(PrometheusMetrics::new_with_registry(registry.clone()).is_ok());
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
