//! `itinera-ai`
//!
//! **Responsibility:** the LLM boundary.
//!
//! - Builds the generation instruction for a [`TripRequest`](itinera_core::TripRequest).
//! - Calls a chat-completion provider through the [`LlmProvider`] trait.
//! - Validates the returned payload into an [`Itinerary`].
//!
//! It never touches the job store; callers decide what to persist.

pub mod error;
pub mod itinerary;
pub mod openai;
pub mod prompt;
pub mod provider;

pub use error::ProviderError;
pub use itinerary::{Activity, DayPlan, Itinerary};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::itinerary_prompt;
pub use provider::{LlmProvider, generate_itinerary};
