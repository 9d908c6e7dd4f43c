//! Itinerary generation for one job.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use tracing::{error, info, instrument, warn};

use itinera_ai::{LlmProvider, generate_itinerary};
use itinera_core::{JobId, JobRecord, JobStatus, TerminalUpdate, TripRequest};

use super::store::{JobStore, JobStoreError};

/// Runs the provider call for a job and persists its terminal state.
#[derive(Clone)]
pub struct ItineraryGenerator {
    store: Arc<dyn JobStore>,
    provider: Arc<dyn LlmProvider>,
}

impl ItineraryGenerator {
    pub fn new(store: Arc<dyn JobStore>, provider: Arc<dyn LlmProvider>) -> Self {
        Self { store, provider }
    }

    /// Full background flow for one accepted request:
    /// insert the `processing` record, generate, write the terminal update.
    ///
    /// The insert is awaited before the provider is called, so the terminal
    /// update can never land before the record exists. If the insert fails the
    /// job is abandoned without calling the provider.
    #[instrument(
        skip(self, record, request),
        fields(job_id = %record.job_id, destination = %request.destination, duration_days = %request.duration_days)
    )]
    pub async fn process(&self, record: JobRecord, request: TripRequest) -> Result<JobStatus, JobStoreError> {
        let job_id = record.job_id;

        if let Err(e) = self.store.insert(&record).await {
            error!(error = %e, "failed to create job record");
            return Err(e);
        }

        let update = self.generate(job_id, &request).await;

        if let Err(e) = self.store.update(job_id, &update).await {
            error!(error = %e, status = %update.status(), "failed to persist terminal job state");
            return Err(e);
        }

        info!(status = %update.status(), "job finished");
        Ok(update.status())
    }

    /// Call the provider and turn the outcome into a terminal update.
    ///
    /// Never fails: every provider or payload error becomes a `failed` update,
    /// and so does a panic inside the provider.
    pub async fn generate(&self, job_id: JobId, request: &TripRequest) -> TerminalUpdate {
        let outcome = AssertUnwindSafe(generate_itinerary(self.provider.as_ref(), request))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(itinerary)) => TerminalUpdate::completed(itinerary.to_record_value(), Utc::now()),
            Ok(Err(e)) => {
                warn!(job_id = %job_id, error = %e, "LLM generation failed");
                TerminalUpdate::failed(e.to_string(), Utc::now())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(job_id = %job_id, panic = %message, "LLM generation panicked");
                TerminalUpdate::failed(format!("unexpected error during generation: {message}"), Utc::now())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
