//! Environment-driven agent configuration.
//!
//! Every knob comes from a `HEALTHWATCH_*` environment variable; there is
//! no config file. `from_lookup` takes the variable resolver as a closure
//! so parsing is testable without mutating the process environment.

use std::str::FromStr;

use crate::constants::DEFAULT_FEED_REGION;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "invalid log level '{s}': expected error|warn|info|debug|trace"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" => Ok(Self::Text),
            _ => Err(format!("invalid log format '{s}': expected json|text")),
        }
    }
}

/// Fully resolved agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// How far back the feed is polled, in hours. Also drives record TTL.
    pub lookback_hours: u64,
    /// Regions to restrict polling to. Empty = all regions.
    pub regions: Vec<String>,
    /// Base64 ciphertext of the webhook URL (scheme stripped).
    pub encrypted_webhook: String,
    /// Path of the redb dedup database.
    pub store_path: String,
    /// Base URL of the health feed API.
    pub feed_endpoint: String,
    /// Endpoint that decrypts `encrypted_webhook`.
    pub decrypt_endpoint: String,
    /// Operating region reported to the feed API.
    pub feed_region: String,
    /// Optional `Name: value` header for feed and enrichment requests.
    pub feed_auth_header: Option<String>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl AgentConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable resolver.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            match lookup(var) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ConfigError::MissingVar(var)),
            }
        };

        let lookback_raw = required("HEALTHWATCH_LOOKBACK_HOURS")?;
        let lookback_hours =
            lookback_raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: "HEALTHWATCH_LOOKBACK_HOURS",
                    value: lookback_raw.clone(),
                    reason: e.to_string(),
                })?;

        let regions = lookup("HEALTHWATCH_REGIONS")
            .map(|raw| parse_regions(&raw))
            .unwrap_or_default();

        let log_level = match lookup("HEALTHWATCH_LOG_LEVEL") {
            Some(raw) => raw
                .parse::<LogLevel>()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "HEALTHWATCH_LOG_LEVEL",
                    value: raw,
                    reason,
                })?,
            None => LogLevel::Info,
        };

        let log_format = match lookup("HEALTHWATCH_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "HEALTHWATCH_LOG_FORMAT",
                    value: raw,
                    reason,
                })?,
            None => LogFormat::Json,
        };

        Ok(Self {
            lookback_hours,
            regions,
            encrypted_webhook: required("HEALTHWATCH_ENCRYPTED_WEBHOOK")?,
            store_path: required("HEALTHWATCH_STORE_PATH")?,
            feed_endpoint: required("HEALTHWATCH_FEED_ENDPOINT")?,
            decrypt_endpoint: required("HEALTHWATCH_DECRYPT_ENDPOINT")?,
            feed_region: lookup("HEALTHWATCH_FEED_REGION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FEED_REGION.to_string()),
            feed_auth_header: lookup("HEALTHWATCH_FEED_AUTH_HEADER")
                .filter(|v| !v.trim().is_empty()),
            log_level,
            log_format,
        })
    }
}

/// Split a comma-separated region list, dropping blanks and any stray
/// single quotes left over from shell quoting.
fn parse_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().trim_matches('\'').trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
