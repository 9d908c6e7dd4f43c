use thiserror::Error;

/// Failure of a single generation attempt.
///
/// There is no transient/permanent split: every variant ends the job as failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("LLM request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("LLM API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("LLM response missing content: {0}")]
    MissingContent(String),

    #[error("failed to parse LLM content: {0}")]
    ContentParse(#[from] serde_json::Error),

    #[error("LLM returned an invalid itinerary: {0}")]
    InvalidPayload(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_carries_status_and_body() {
        let err = ProviderError::Api {
            status: 500,
            body: r#"{"error":"boom"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"LLM API error: 500 - {"error":"boom"}"#);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn parse_error_is_reported_as_such() {
        let err: ProviderError = serde_json::from_str::<serde_json::Value>("not json").unwrap_err().into();
        assert!(err.to_string().starts_with("failed to parse LLM content"));
        assert_eq!(err.status(), None);
    }
}
