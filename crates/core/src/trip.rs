//! Trip request validation.
//!
//! The inbound payload is loosely typed JSON; a [`TripRequest`] only exists once
//! both fields passed their checks.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Message returned to clients for any field-level validation failure.
pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input. Please provide a valid destination (string) and durationDays (positive number).";

/// Travel destination, stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    /// Rejects empty and whitespace-only input.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("destination must be a non-empty string"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Destination {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for Destination {}

/// Trip length in days, in `1..=DurationDays::MAX`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationDays(u32);

impl DurationDays {
    /// Upper bound; the persisted column is a signed 32-bit integer.
    pub const MAX: u32 = i32::MAX as u32;

    pub fn new(days: u32) -> DomainResult<Self> {
        if days == 0 {
            return Err(DomainError::validation("durationDays must be greater than zero"));
        }
        if days > Self::MAX {
            return Err(DomainError::validation("durationDays is out of range"));
        }
        Ok(Self(days))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for DurationDays {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ValueObject for DurationDays {}

/// A validated itinerary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub destination: Destination,
    pub duration_days: DurationDays,
}

impl TripRequest {
    pub fn new(destination: Destination, duration_days: DurationDays) -> Self {
        Self {
            destination,
            duration_days,
        }
    }

    /// Validate a request body of shape `{"destination": string, "durationDays": number}`.
    ///
    /// `durationDays` must be a whole number; `3` and `3.0` are equivalent.
    /// Unknown fields are ignored.
    pub fn from_json(body: &JsonValue) -> DomainResult<Self> {
        let destination = match body.get("destination") {
            Some(JsonValue::String(s)) => Destination::parse(s)?,
            Some(_) => return Err(DomainError::validation("destination must be a string")),
            None => return Err(DomainError::validation("destination is required")),
        };

        let duration_days = match body.get("durationDays") {
            Some(JsonValue::Number(n)) => parse_days(n)?,
            Some(_) => return Err(DomainError::validation("durationDays must be a number")),
            None => return Err(DomainError::validation("durationDays is required")),
        };

        Ok(Self::new(destination, duration_days))
    }
}

fn parse_days(n: &serde_json::Number) -> DomainResult<DurationDays> {
    if let Some(days) = n.as_u64() {
        let days = u32::try_from(days)
            .map_err(|_| DomainError::validation("durationDays is out of range"))?;
        return DurationDays::new(days);
    }
    if n.as_i64().is_some() {
        return Err(DomainError::validation("durationDays must be greater than zero"));
    }
    match n.as_f64() {
        Some(f) if f <= 0.0 => Err(DomainError::validation("durationDays must be greater than zero")),
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f > f64::from(DurationDays::MAX) {
                return Err(DomainError::validation("durationDays is out of range"));
            }
            // Whole and within range, so the cast is exact.
            DurationDays::new(f as u32)
        }
        _ => Err(DomainError::validation("durationDays must be a whole number of days")),
    }
}
