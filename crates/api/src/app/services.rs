use std::sync::Arc;

use itinera_ai::{LlmProvider, OpenAiClient, ProviderError};
use itinera_infra::AppConfig;
use itinera_infra::jobs::{
    BackgroundTasks, InMemoryJobStore, ItineraryGenerator, JobStore, JobStoreError, PostgresJobStore,
};

/// Shared services injected into handlers.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn JobStore>,
    pub generator: ItineraryGenerator,
    pub tasks: BackgroundTasks,
}

impl AppServices {
    pub fn new(store: Arc<dyn JobStore>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            generator: ItineraryGenerator::new(store.clone(), provider),
            store,
            tasks: BackgroundTasks::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServicesError {
    #[error("job store unavailable: {0}")]
    Store(#[from] JobStoreError),
    #[error("LLM client setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Wire services from configuration.
///
/// Without `DATABASE_URL` job records live in process memory.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServicesError> {
    let store: Arc<dyn JobStore> = match &config.database_url {
        Some(url) => Arc::new(PostgresJobStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set; job records are kept in memory");
            Arc::new(InMemoryJobStore::new())
        }
    };

    let provider = OpenAiClient::new(config.openai.clone())?;
    tracing::info!(model = provider.model(), "LLM provider configured");

    Ok(AppServices::new(store, Arc::new(provider)))
}
