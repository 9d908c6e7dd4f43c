//! Itinerary job persistence and background execution.
//!
//! ## Components
//!
//! - `JobStore`: insert/update of job records (in-memory or Postgres)
//! - `ItineraryGenerator`: provider call + terminal update for one job
//! - `BackgroundTasks`: spawns job tasks and lets shutdown wait for them

pub mod background;
pub mod generator;
pub mod postgres;
pub mod store;

pub use background::BackgroundTasks;
pub use generator::ItineraryGenerator;
pub use postgres::PostgresJobStore;
pub use store::{InMemoryJobStore, JobStore, JobStoreError};
