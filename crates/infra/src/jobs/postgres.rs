//! Postgres-backed job store.
//!
//! One row per job in the `itineraries` table. The terminal update is guarded
//! by `status = 'processing'`, so a finished job is never rewritten.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | JobStoreError |
//! |------------|----------------------|---------------|
//! | Database (unique violation) | `23505` | `AlreadyExists` |
//! | Anything else | - | `Storage` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;
use uuid::Uuid;

use itinera_core::{JobId, JobRecord, JobStatus, TerminalUpdate};

use super::store::{JobStore, JobStoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS itineraries (
    job_id        UUID PRIMARY KEY,
    status        TEXT NOT NULL CHECK (status IN ('processing', 'completed', 'failed')),
    destination   TEXT NOT NULL,
    duration_days INTEGER NOT NULL CHECK (duration_days > 0),
    created_at    TIMESTAMPTZ NOT NULL,
    completed_at  TIMESTAMPTZ NULL,
    itinerary     JSONB NULL,
    error         TEXT NULL
)
"#;

/// Postgres job store.
#[derive(Debug, Clone)]
pub struct PostgresJobStore {
    pool: PgPool,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the table exists.
    pub async fn connect(database_url: &str) -> Result<Self, JobStoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), JobStoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn current_status(&self, job_id: JobId) -> Result<Option<JobStatus>, JobStoreError> {
        let row = sqlx::query("SELECT status FROM itineraries WHERE job_id = $1")
            .bind(*job_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("current_status", e))?;

        row.map(|r| {
            let status: String = r.try_get("status").map_err(|e| map_sqlx_error("current_status", e))?;
            status
                .parse::<JobStatus>()
                .map_err(|e| JobStoreError::Storage(e.to_string()))
        })
        .transpose()
    }
}

#[async_trait]
impl JobStore for PostgresJobStore {
    #[instrument(skip(self, record), fields(job_id = %record.job_id), err)]
    async fn insert(&self, record: &JobRecord) -> Result<(), JobStoreError> {
        let duration_days = i32::try_from(record.duration_days)
            .map_err(|_| JobStoreError::Storage("duration_days out of range".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO itineraries (job_id, status, destination, duration_days, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*record.job_id.as_uuid())
        .bind(record.status.as_str())
        .bind(&record.destination)
        .bind(duration_days)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique_violation =
                matches!(&e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"));
            if unique_violation {
                JobStoreError::AlreadyExists(record.job_id)
            } else {
                map_sqlx_error("insert", e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self, update), fields(job_id = %job_id, status = %update.status()), err)]
    async fn update(&self, job_id: JobId, update: &TerminalUpdate) -> Result<(), JobStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE itineraries
            SET status = $2, completed_at = $3, itinerary = $4, error = $5
            WHERE job_id = $1 AND status = 'processing'
            "#,
        )
        .bind(*job_id.as_uuid())
        .bind(update.status().as_str())
        .bind(update.completed_at())
        .bind(update.itinerary().cloned())
        .bind(update.error())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.current_status(job_id).await? {
            None => Err(JobStoreError::NotFound(job_id)),
            Some(_) => Err(JobStoreError::AlreadyTerminal(job_id)),
        }
    }

    #[instrument(skip(self), fields(job_id = %job_id), err)]
    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, JobStoreError> {
        let row = sqlx::query(
            r#"
            SELECT job_id, status, destination, duration_days, created_at, completed_at, itinerary, error
            FROM itineraries
            WHERE job_id = $1
            "#,
        )
        .bind(*job_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|r| record_from_row(&r)).transpose()
    }
}

fn record_from_row(row: &PgRow) -> Result<JobRecord, JobStoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode", e);

    let status: String = row.try_get("status").map_err(decode)?;
    let duration_days: i32 = row.try_get("duration_days").map_err(decode)?;

    Ok(JobRecord {
        job_id: JobId::from_uuid(row.try_get::<Uuid, _>("job_id").map_err(decode)?),
        status: status
            .parse()
            .map_err(|e: itinera_core::DomainError| JobStoreError::Storage(e.to_string()))?,
        destination: row.try_get("destination").map_err(decode)?,
        duration_days: u32::try_from(duration_days)
            .map_err(|_| JobStoreError::Storage("negative duration_days in row".to_string()))?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        completed_at: row.try_get::<Option<DateTime<Utc>>, _>("completed_at").map_err(decode)?,
        itinerary: row.try_get::<Option<JsonValue>, _>("itinerary").map_err(decode)?,
        error: row.try_get::<Option<String>, _>("error").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> JobStoreError {
    JobStoreError::Storage(format!("{operation}: {e}"))
}
