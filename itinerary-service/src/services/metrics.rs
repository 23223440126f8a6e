//! Prometheus metrics for itinerary-service.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Once, OnceLock};

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static ITINERARY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

static INIT: Once = Once::new();

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    INIT.call_once(|| {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "itinerary_requests_total",
                "Total itinerary generation requests",
            ),
            &["outcome"],
        )
        .expect("Failed to create itinerary_requests_total metric");

        let provider_latency = HistogramVec::new(
            HistogramOpts::new(
                "itinerary_provider_latency_seconds",
                "Text provider latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["provider", "model"],
        )
        .expect("Failed to create itinerary_provider_latency_seconds metric");

        let provider_errors = IntCounterVec::new(
            Opts::new(
                "itinerary_provider_errors_total",
                "Total text provider errors",
            ),
            &["provider", "error_type"],
        )
        .expect("Failed to create itinerary_provider_errors_total metric");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("Failed to register itinerary_requests_total");
        registry
            .register(Box::new(provider_latency.clone()))
            .expect("Failed to register itinerary_provider_latency_seconds");
        registry
            .register(Box::new(provider_errors.clone()))
            .expect("Failed to register itinerary_provider_errors_total");

        let _ = REGISTRY.set(registry);
        let _ = ITINERARY_REQUESTS_TOTAL.set(requests_total);
        let _ = PROVIDER_LATENCY_SECONDS.set(provider_latency);
        let _ = PROVIDER_ERRORS_TOTAL.set(provider_errors);

        tracing::info!("Prometheus metrics initialized");
    });
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record the outcome of an itinerary request.
pub fn record_request(outcome: &str) {
    if let Some(counter) = ITINERARY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}
