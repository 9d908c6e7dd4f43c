use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use itinera_core::TripRequest;

use crate::error::ProviderError;
use crate::itinerary::Itinerary;
use crate::prompt::itinerary_prompt;

/// A chat-completion provider that answers with a JSON object.
///
/// One call, one user message, no retries. Implementations return the parsed
/// message content of the first choice.
#[async_trait]
pub trait LlmProvider: Send + Sync + 'static {
    async fn complete_json(&self, prompt: &str) -> Result<JsonValue, ProviderError>;
}

/// Build the prompt, call the provider once and validate the payload.
pub async fn generate_itinerary<P>(provider: &P, request: &TripRequest) -> Result<Itinerary, ProviderError>
where
    P: LlmProvider + ?Sized,
{
    let prompt = itinerary_prompt(request);
    debug!(prompt_len = prompt.len(), "generate_itinerary: calling provider");

    let payload = provider.complete_json(&prompt).await?;
    let itinerary = Itinerary::from_payload(payload)?;

    let requested = request.duration_days.get() as usize;
    if itinerary.day_count() != requested {
        warn!(
            requested,
            returned = itinerary.day_count(),
            "itinerary day count differs from request"
        );
    }

    Ok(itinerary)
}
