//! `itinera-core` : domain foundation for itinerary generation jobs.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod job;
pub mod trip;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::JobId;
pub use job::{JobRecord, JobStatus, TerminalUpdate};
pub use trip::{Destination, DurationDays, TripRequest};
pub use value_object::ValueObject;
