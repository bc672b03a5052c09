#![forbid(unsafe_code)]

pub mod enrichment;
pub mod feed;
pub mod notify;
pub mod secrets;
pub mod storage;

/// User agent sent by every outbound HTTP client in this crate.
pub(crate) const USER_AGENT: &str = concat!("healthwatch-agent/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout for outbound HTTP clients.
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 30;
