use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing::Subscriber;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt};

/// JSON log lines with source location, flattened for log shippers.
fn json_fmt_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .json()
        .flatten_event(true)
}

/// Install the global subscriber: env filter, JSON fmt layer, and an OTLP
/// exporter when an endpoint is given.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracing(service_name: &str, log_level: &str, otlp_endpoint: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let Some(endpoint) = otlp_endpoint else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_fmt_layer())
            .init();
        return;
    };

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio);

    match tracer {
        Ok(tracer) => {
            let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(telemetry)
                .with(json_fmt_layer())
                .init();
        }
        Err(e) => {
            // Keep logging to stdout rather than refusing to start.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_fmt_layer())
                .init();
            tracing::warn!(
                service = service_name,
                endpoint = endpoint,
                error = %e,
                "Failed to initialize OTLP tracer, exporting logs only"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installs the global subscriber, so this is the only test in the crate
    // that may call `init_tracing`.
    #[tokio::test(flavor = "multi_thread")]
    async fn installs_subscriber_with_otlp_exporter() {
        init_tracing("service-core-test", "debug", Some("http://127.0.0.1:4317"));

        tracing::info!(check = "otlp", "subscriber installed");
        assert!(tracing::dispatcher::has_been_set());
    }
}
