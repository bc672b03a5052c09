use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::EventError;

/// Globally unique, opaque identifier of one health event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventArn(pub String);

impl EventArn {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventArn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventArn {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One operational-health event as reported by the organization feed.
///
/// An immutable snapshot taken per poll; never persisted as-is. Only the
/// dedup record derived from it outlives the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthEvent {
    pub arn: EventArn,
    pub event_type_code: String,
    pub service: String,
    pub region: String,
    pub status_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_updated_time: DateTime<Utc>,
}

impl HealthEvent {
    /// The event's last-updated time in the persisted form: unix epoch
    /// seconds, rendered as a string.
    pub fn last_updated_epoch(&self) -> String {
        self.last_updated_time.timestamp().to_string()
    }
}

/// One page of events from the feed.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<HealthEvent>,
    pub next_token: Option<String>,
}

/// Ordered set of region identifiers the feed query is scoped to.
/// Empty means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter(Vec<String>);

impl RegionFilter {
    pub fn new(regions: Vec<String>) -> Self {
        Self(regions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn regions(&self) -> &[String] {
        &self.0
    }
}

/// Parse a feed timestamp into a typed value.
///
/// Accepts unix epoch seconds (all-digit string, optional leading `-`) or
/// an RFC 3339 datetime. Anything else is a `MalformedTimestamp` for the
/// named field.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, EventError> {
    let malformed = || EventError::MalformedTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };

    let digits = value.strip_prefix('-').unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = value.parse().map_err(|_| malformed())?;
        return DateTime::from_timestamp(secs, 0).ok_or_else(malformed);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_epoch_seconds() {
        let ts = parse_timestamp("lastUpdatedTime", "1700000000").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_rfc3339() {
        let ts = parse_timestamp("startTime", "2023-11-14T22:13:20Z").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let ts = parse_timestamp("startTime", "2023-11-14T17:13:20-05:00").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn malformed_timestamp_names_field() {
        let err = parse_timestamp("endTime", "yesterday-ish").unwrap_err();
        match err {
            EventError::MalformedTimestamp { field, value } => {
                assert_eq!(field, "endTime");
                assert_eq!(value, "yesterday-ish");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_timestamp_is_malformed() {
        assert!(parse_timestamp("startTime", "").is_err());
    }

    #[test]
    fn last_updated_epoch_renders_seconds() {
        let event = HealthEvent {
            arn: EventArn::from("arn:test:event/one"),
            event_type_code: "ISSUE".to_string(),
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            status_code: "open".to_string(),
            start_time: DateTime::from_timestamp(1_699_990_000, 0).unwrap(),
            end_time: None,
            last_updated_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(event.last_updated_epoch(), "1700000000");
    }

    #[test]
    fn region_filter_empty_means_no_filter() {
        assert!(RegionFilter::default().is_empty());
        let filter = RegionFilter::new(vec!["us-east-1".to_string(), "eu-west-1".to_string()]);
        assert!(!filter.is_empty());
        assert_eq!(filter.regions(), ["us-east-1", "eu-west-1"]);
    }
}
