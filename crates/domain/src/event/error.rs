use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed timestamp in '{field}': '{value}'")]
    MalformedTimestamp { field: String, value: String },
}

/// Errors from the event feed collaborator. The feed adapter retries
/// internally; these surface only once its retry ceiling is exhausted.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    RequestFailed(String),

    #[error("feed returned HTTP {0}")]
    HttpStatus(u16),

    #[error("feed response decode failed: {0}")]
    DecodeFailed(String),
}
