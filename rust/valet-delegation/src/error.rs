use thiserror::Error;

/// Errors produced while creating or decoding a [`crate::Delegation`].
#[derive(Debug, Error)]
pub enum DelegationError {
    /// A timestamp field is not RFC 3339.
    #[error("invalid {field} timestamp: {source}")]
    Timestamp {
        /// Which field failed to parse.
        field: &'static str,
        /// The parser error.
        source: chrono::ParseError,
    },

    /// The requested duration does not fit in the timestamp range.
    #[error("delegation duration of {0} is out of range")]
    DurationOutOfRange(String),

    /// The delegation could not be (de)serialized as JSON.
    #[error("delegation JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
