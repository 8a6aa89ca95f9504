use thiserror::Error;

/// A query that never produced a classifiable service response.
///
/// The controller collapses every variant into the same generic message;
/// the detail is only kept for logging.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid weather endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}
