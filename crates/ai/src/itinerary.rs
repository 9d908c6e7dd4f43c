//! Structured itinerary payload returned by the provider.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ProviderError;

/// One scheduled activity within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Time-of-day label ("Morning", "Afternoon", ...).
    pub time: String,
    pub description: String,
    pub location: String,
}

/// One day of the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub theme: String,
    pub activities: Vec<Activity>,
}

/// Day-by-day itinerary.
///
/// Wire shape is `{"itinerary": [DayPlan, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(rename = "itinerary")]
    pub days: Vec<DayPlan>,
}

impl Itinerary {
    /// Validate a parsed provider payload.
    pub fn from_payload(payload: JsonValue) -> Result<Self, ProviderError> {
        if payload.get("itinerary").is_none() {
            return Err(ProviderError::InvalidPayload(
                "missing top-level \"itinerary\" field".to_string(),
            ));
        }
        serde_json::from_value(payload).map_err(|e| ProviderError::InvalidPayload(e.to_string()))
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// The value stored in the job record's `itinerary` field (the day list).
    pub fn to_record_value(&self) -> JsonValue {
        serde_json::to_value(&self.days).unwrap_or(JsonValue::Null)
    }
}
