//! Subscriber construction for the itinerary service.
//!
//! Output is one JSON object per line. Spans opened by `#[instrument]` on the
//! job store and generator emit a close event carrying `time.busy`/`time.idle`,
//! which is how provider latency shows up in the logs.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Resolve the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the JSON subscriber. Later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .try_init();
}
