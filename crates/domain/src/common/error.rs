use thiserror::Error;

use crate::dedup::error::StoreError;
use crate::event::error::{EventError, FeedError};
use crate::notify::error::NotifyError;

/// Top-level error taxonomy for one poll invocation.
///
/// Only `FeedUnavailable` and `SecretDecryptionFailed` abort the run;
/// everything else is scoped to a single event and logged where it occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("event feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("dedup store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("enrichment failed for '{arn}': {reason}")]
    EnrichmentFailed { arn: String, reason: String },

    #[error("webhook secret decryption failed: {0}")]
    SecretDecryptionFailed(String),

    #[error("notification delivery failed: {0}")]
    NotificationDeliveryFailed(String),

    #[error("malformed timestamp in '{field}': '{value}'")]
    MalformedTimestamp { field: String, value: String },
}

/// Errors from the secret-decryption collaborator. Fatal: the invocation
/// aborts before any event processing begins.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("decrypt request failed: {0}")]
    RequestFailed(String),

    #[error("decrypt endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("ciphertext is not valid base64: {0}")]
    InvalidCiphertext(String),
}

impl From<FeedError> for PipelineError {
    fn from(e: FeedError) -> Self {
        Self::FeedUnavailable(e.to_string())
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}

impl From<NotifyError> for PipelineError {
    fn from(e: NotifyError) -> Self {
        Self::NotificationDeliveryFailed(e.to_string())
    }
}

impl From<SecretError> for PipelineError {
    fn from(e: SecretError) -> Self {
        Self::SecretDecryptionFailed(e.to_string())
    }
}

impl From<EventError> for PipelineError {
    fn from(e: EventError) -> Self {
        let EventError::MalformedTimestamp { field, value } = e;
        Self::MalformedTimestamp { field, value }
    }
}
