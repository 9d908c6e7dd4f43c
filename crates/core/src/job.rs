//! Job record and its lifecycle.
//!
//! A record is created in `processing` and moved exactly once to a terminal
//! status. `itinerary` is set iff `completed`, `error` iff `failed`, and
//! `completed_at` only on the terminal transition.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};
use crate::id::JobId;
use crate::trip::TripRequest;

/// Job status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(DomainError::validation(format!("unknown job status: {other}"))),
        }
    }
}

/// The persisted job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: JobId,
    pub status: JobStatus,
    pub destination: String,
    pub duration_days: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub itinerary: Option<JsonValue>,
    pub error: Option<String>,
}

impl JobRecord {
    /// New record in `processing` for a validated request.
    pub fn processing(job_id: JobId, request: &TripRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            status: JobStatus::Processing,
            destination: request.destination.as_str().to_string(),
            duration_days: request.duration_days.get(),
            created_at,
            completed_at: None,
            itinerary: None,
            error: None,
        }
    }

    /// Apply the single terminal update.
    pub fn apply(&mut self, update: &TerminalUpdate) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "job {} is already {}",
                self.job_id, self.status
            )));
        }

        self.status = update.status;
        self.completed_at = Some(update.completed_at);
        self.itinerary = update.itinerary.clone();
        self.error = update.error.clone();
        Ok(())
    }
}

/// Fields written by the generator when a job finishes.
///
/// Only constructible through [`TerminalUpdate::completed`] and
/// [`TerminalUpdate::failed`], so status and payload always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalUpdate {
    status: JobStatus,
    completed_at: DateTime<Utc>,
    itinerary: Option<JsonValue>,
    error: Option<String>,
}

impl TerminalUpdate {
    pub fn completed(itinerary: JsonValue, completed_at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Completed,
            completed_at,
            itinerary: Some(itinerary),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Failed,
            completed_at,
            itinerary: None,
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn itinerary(&self) -> Option<&JsonValue> {
        self.itinerary.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
