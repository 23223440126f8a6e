use itinerary_service::config::ItineraryConfig;
use itinerary_service::services::metrics::init_metrics;
use itinerary_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Tracing is not up yet, so configuration errors go to stderr.
    let config = ItineraryConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "itinerary-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        provider = ?config.provider,
        model = %config.gemini.model,
        port = config.common.port,
        "Starting itinerary-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
