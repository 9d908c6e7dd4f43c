use axum::{Router, routing::post};

pub mod itineraries;
pub mod system;

use crate::app::errors;

/// Itinerary intake. Only POST is accepted; every other method gets a 405.
pub fn router() -> Router {
    let intake = || post(itineraries::create_itinerary).fallback(errors::method_not_allowed);

    Router::new()
        .route("/", intake())
        .route("/itineraries", intake())
}
