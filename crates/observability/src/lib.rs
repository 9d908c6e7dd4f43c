//! Structured logging for the itinerary service binaries and tests.

/// Install the process-wide JSON subscriber; repeated calls are ignored.
pub fn init() {
    tracing::init();
}

pub mod tracing;
