use thiserror::Error;

/// Delivery errors from the webhook transport. Best-effort channel: the
/// caller logs these and moves on, no retry.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    RequestFailed(String),

    #[error("webhook returned HTTP {0}")]
    HttpStatus(u16),

    #[error("payload serialization failed: {0}")]
    Serialize(String),
}
