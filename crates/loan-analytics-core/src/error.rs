use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid record: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AnalyticsError {
    /// Shorthand for the validation variant used throughout the normalizer.
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        AnalyticsError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        AnalyticsError::SerializationError(e.to_string())
    }
}
