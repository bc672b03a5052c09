use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment request failed: {0}")]
    RequestFailed(String),

    #[error("enrichment endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("enrichment response decode failed: {0}")]
    DecodeFailed(String),

    /// No successful detail result came back for the event. This is a hard
    /// failure for the event's pipeline leg.
    #[error("no successful detail result for '{0}'")]
    NoDetail(String),
}
