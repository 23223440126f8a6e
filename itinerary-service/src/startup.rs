//! Application startup and lifecycle management.

use crate::config::{ItineraryConfig, ProviderKind};
use crate::handlers::{
    health::{health_check, readiness_check, root},
    itinerary::generate_itinerary,
    metrics::metrics,
};
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::TextProvider;
use crate::services::ItineraryGenerator;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ItineraryConfig>,
    pub text_provider: Arc<dyn TextProvider>,
    pub generator: Arc<ItineraryGenerator>,
}

impl AppState {
    pub fn new(config: ItineraryConfig, text_provider: Arc<dyn TextProvider>) -> Self {
        let generator = Arc::new(ItineraryGenerator::new(
            text_provider.clone(),
            config.itinerary_options(),
        ));

        Self {
            config: Arc::new(config),
            text_provider,
            generator,
        }
    }
}

/// Construct the provider selected by configuration.
pub fn build_text_provider(config: &ItineraryConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let provider: Arc<dyn TextProvider> = match config.provider {
        ProviderKind::Gemini => {
            let provider = GeminiTextProvider::new(config.gemini_config())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            Arc::new(provider)
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock text provider; itineraries are canned");
            Arc::new(MockTextProvider::new())
        }
    };

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "Initialized text provider"
    );

    Ok(provider)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .route("/generate-itinerary", post(generate_itinerary))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the trace span sees the id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider selected by configuration.
    pub async fn build(config: ItineraryConfig) -> Result<Self, AppError> {
        let text_provider = build_text_provider(&config)?;
        Self::build_with_provider(config, text_provider).await
    }

    /// Build the application around an existing provider.
    pub async fn build_with_provider(
        config: ItineraryConfig,
        text_provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Itinerary service: HTTP on port {}", port);

        let router = build_router(AppState::new(config, text_provider));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
