//! Job storage abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use itinera_core::{JobId, JobRecord, TerminalUpdate};

/// Datastore for job records, keyed by `JobId`.
///
/// Two writers touch a record: the initial insert and the single terminal
/// update. Retrieval exists for inspection; no HTTP route exposes it.
#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// Insert a new record. Fails if the id already exists.
    async fn insert(&self, record: &JobRecord) -> Result<(), JobStoreError>;

    /// Write status, completedAt, itinerary and error as one update.
    ///
    /// Fails if the record is missing or already terminal.
    async fn update(&self, job_id: JobId, update: &TerminalUpdate) -> Result<(), JobStoreError>;

    /// Get a record by id.
    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, JobStoreError>;
}

/// Job store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job already exists: {0}")]
    AlreadyExists(JobId),
    #[error("job already finished: {0}")]
    AlreadyTerminal(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// In-memory job store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record, oldest first.
    pub fn all(&self) -> Vec<JobRecord> {
        let jobs = match self.jobs.read() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut records: Vec<_> = jobs.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        records
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> JobStoreError {
    JobStoreError::Storage("job store lock poisoned".to_string())
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, record: &JobRecord) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        if jobs.contains_key(&record.job_id) {
            return Err(JobStoreError::AlreadyExists(record.job_id));
        }
        jobs.insert(record.job_id, record.clone());
        Ok(())
    }

    async fn update(&self, job_id: JobId, update: &TerminalUpdate) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let record = jobs.get_mut(&job_id).ok_or(JobStoreError::NotFound(job_id))?;
        record
            .apply(update)
            .map_err(|_| JobStoreError::AlreadyTerminal(job_id))
    }

    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, JobStoreError> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.get(&job_id).cloned())
    }
}
