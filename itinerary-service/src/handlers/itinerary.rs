use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

use crate::models::{ItineraryResult, TripRequest};
use crate::services::metrics;
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<ItineraryResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        metrics::record_request("bad_request");
        AppError::BadRequest(anyhow::anyhow!(
            "Invalid request body: {}",
            rejection.body_text()
        ))
    })?;

    match state.generator.generate(&request).await {
        Ok(result) => {
            metrics::record_request("success");
            Ok(Json(result))
        }
        Err(e) => {
            metrics::record_request(e.outcome());
            tracing::warn!(
                location = %request.location,
                error = %e,
                "Itinerary generation failed"
            );
            Err(e.into())
        }
    }
}
