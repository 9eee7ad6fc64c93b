//! Prometheus metrics backend for the dispatch pipeline.
//!
//! [`PrometheusMetrics`] implements [`abd_core::MetricsBackend`]; inject it with
//! [`abd_core::DispatchContext::with_metrics`].
//!
//! ## Metrics
//! - `abd_activations_total{outcome}` - Counter
//! - `abd_stage_failures_total{stage}` - Counter
//! - `abd_stage_duration_seconds{stage}` - Histogram
//!
//! The crate does not serve `/metrics`; use [`PrometheusMetrics::gather`] or
//! [`PrometheusMetrics::render`] from whatever exposition the host provides.
mod backend;
pub use backend::PrometheusMetrics;
