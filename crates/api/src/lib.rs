//! HTTP API: itinerary request intake and service wiring.

pub mod app;
