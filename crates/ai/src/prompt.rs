use itinera_core::TripRequest;

/// Generation instruction for a day-by-day itinerary.
pub fn itinerary_prompt(request: &TripRequest) -> String {
    let days = request.duration_days;
    let destination = &request.destination;
    format!(
        "Generate a detailed JSON travel itinerary for a {days}-day trip to {destination}. \
         The JSON must strictly follow this structure: \
         {{ \"itinerary\": [ {{ \"day\": 1, \"theme\": \"...\", \"activities\": \
         [ {{ \"time\": \"Morning\", \"description\": \"...\", \"location\": \"...\" }} ] }} ] }}. \
         The itinerary should have exactly {days} days. \
         Only provide the JSON object, do not include any other text or markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_core::{Destination, DurationDays};

    #[test]
    fn names_destination_day_count_and_shape() {
        let req = TripRequest::new(Destination::parse("Paris").unwrap(), DurationDays::new(3).unwrap());
        let prompt = itinerary_prompt(&req);

        assert!(prompt.contains("3-day trip to Paris"));
        assert!(prompt.contains("exactly 3 days"));
        assert!(prompt.contains("\"itinerary\""));
        assert!(prompt.contains("\"activities\""));
        assert!(prompt.contains("\"location\""));
        assert!(prompt.contains("do not include any other text or markdown"));
    }
}
