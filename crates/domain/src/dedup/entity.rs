use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::entity::HealthEvent;

/// Grace period added on top of the lookback window when computing a
/// record's expiry, so a record outlives the window it gates.
pub const EXPIRY_GRACE_SECS: i64 = 3600;

/// Persisted marker of the last-notified state of one event identifier.
///
/// At most one record exists per identifier; a record is replaced (not
/// appended) whenever the event's last-updated time changes. The store is
/// responsible for removing the record once `expiry` passes; the pipeline
/// never deletes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupRecord {
    /// Event identifier (the record key).
    #[serde(rename = "identifier")]
    pub arn: String,
    /// Event last-updated time as seen at write time (epoch seconds).
    #[serde(rename = "lastUpdatedTime")]
    pub last_updated_time: String,
    /// When this record was written (epoch seconds).
    #[serde(rename = "firstSeen")]
    pub first_seen: String,
    /// Unix epoch seconds after which the store may remove the record.
    pub expiry: i64,
}

impl DedupRecord {
    /// Build the replacement record for an event that is about to be
    /// notified: first-seen = now, expiry = now + lookback + grace.
    pub fn for_event(event: &HealthEvent, now: DateTime<Utc>, lookback: Duration) -> Self {
        let now_epoch = now.timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let lookback_secs = lookback.as_secs() as i64;
        Self {
            arn: event.arn.to_string(),
            last_updated_time: event.last_updated_epoch(),
            first_seen: now_epoch.to_string(),
            expiry: now_epoch + lookback_secs + EXPIRY_GRACE_SECS,
        }
    }

    pub fn is_expired(&self, now_epoch: i64) -> bool {
        now_epoch > self.expiry
    }
}
