//! Observability infrastructure - tracing export and Prometheus metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_adapter_failure, record_fallback,
    record_http_request, record_question_outcome, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
