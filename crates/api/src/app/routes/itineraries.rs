use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use itinera_core::{JobId, JobRecord, TripRequest, trip::INVALID_INPUT_MESSAGE};

use crate::app::{dto, errors, services::AppServices};

/// POST /itineraries
///
/// Validates the body, hands the job to a background task and answers 202
/// without waiting for the record write or the provider call.
pub async fn create_itinerary(Extension(services): Extension<Arc<AppServices>>, body: Bytes) -> Response {
    let body: JsonValue = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "rejecting unparseable request body");
            return errors::json_error(StatusCode::BAD_REQUEST, format!("Failed to parse request body: {e}"));
        }
    };

    let request = match TripRequest::from_json(&body) {
        Ok(r) => r,
        Err(e) => {
            debug!(reason = %e, "rejecting invalid itinerary request");
            return errors::json_error(StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE);
        }
    };

    let job_id = JobId::new();
    let record = JobRecord::processing(job_id, &request, Utc::now());

    info!(
        job_id = %job_id,
        destination = %request.destination,
        duration_days = %request.duration_days,
        "itinerary job accepted"
    );

    let generator = services.generator.clone();
    services
        .tasks
        .spawn(async move { generator.process(record, request).await });

    (StatusCode::ACCEPTED, Json(dto::AcceptedResponse { job_id })).into_response()
}
