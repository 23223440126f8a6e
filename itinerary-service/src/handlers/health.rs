use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness message on the root path.
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "AI Travel Itinerary API is running" }))
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "itinerary-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.text_provider.name(),
        "model": state.text_provider.model(),
    }))
}

/// Readiness check endpoint for K8s readiness probes.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.text_provider.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Text provider health check failed");
        AppError::ServiceUnavailable(e.to_string())
    })?;

    Ok(Json(json!({ "status": "ready" })))
}
