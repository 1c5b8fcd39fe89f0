//! Prometheus metrics for classroom-ai-service.
//!
//! Provides HTTP and model-call metrics for observability.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static METRICS: OnceLock<ServiceMetrics> = OnceLock::new();

pub struct ServiceMetrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    model_requests_total: IntCounterVec,
    model_latency_seconds: HistogramVec,
    rate_limited_total: IntCounterVec,
}

impl ServiceMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        // HTTP request counter
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("Failed to create http_requests_total metric");

        // HTTP request duration histogram
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["method", "path"],
        )
        .expect("Failed to create http_request_duration_seconds metric");

        // Model call outcomes per endpoint
        let model_requests_total = IntCounterVec::new(
            Opts::new("model_requests_total", "Total external model calls"),
            &["endpoint", "outcome"],
        )
        .expect("Failed to create model_requests_total metric");

        // Model latency histogram
        let model_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "model_latency_seconds",
                "External model latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
            &["endpoint"],
        )
        .expect("Failed to create model_latency_seconds metric");

        // Local limiter denials
        let rate_limited_total = IntCounterVec::new(
            Opts::new(
                "rate_limited_total",
                "Requests denied by the model-call rate limiter",
            ),
            &["endpoint"],
        )
        .expect("Failed to create rate_limited_total metric");

        for collector in [
            Box::new(http_requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(http_request_duration_seconds.clone()),
            Box::new(model_requests_total.clone()),
            Box::new(model_latency_seconds.clone()),
            Box::new(rate_limited_total.clone()),
        ] {
            registry
                .register(collector)
                .expect("Failed to register metric");
        }

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            model_requests_total,
            model_latency_seconds,
            rate_limited_total,
        }
    }
}

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    metrics();
}

fn metrics() -> &'static ServiceMetrics {
    METRICS.get_or_init(ServiceMetrics::new)
}

/// Record one external model call.
pub fn record_model_call(endpoint: &str, outcome: &str, latency: Duration) {
    let m = metrics();
    m.model_requests_total
        .with_label_values(&[endpoint, outcome])
        .inc();
    m.model_latency_seconds
        .with_label_values(&[endpoint])
        .observe(latency.as_secs_f64());
}

pub fn record_rate_limited(endpoint: &str) {
    metrics()
        .rate_limited_total
        .with_label_values(&[endpoint])
        .inc();
}

/// Middleware recording request counts and durations by matched route.
pub async fn http_metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let m = metrics();
    let status = response.status().as_u16().to_string();
    m.http_requests_total
        .with_label_values(&[method.as_str(), path.as_str(), status.as_str()])
        .inc();
    m.http_request_duration_seconds
        .with_label_values(&[method.as_str(), path.as_str()])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Render all metrics in the Prometheus text format.
pub fn gather() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder.encode(&metrics().registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_calls_appear_in_exposition() {
        init_metrics();
        record_model_call("analyze_activity", "success", Duration::from_millis(250));
        record_rate_limited("analyze_activity");

        let text = gather().expect("metrics encode");
        assert!(text.contains("model_requests_total"));
        assert!(text.contains("rate_limited_total{endpoint=\"analyze_activity\"}"));
    }
}
