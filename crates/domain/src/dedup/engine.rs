use std::time::Duration;

use chrono::{DateTime, Utc};

use super::entity::DedupRecord;
use crate::event::entity::HealthEvent;

/// Outcome of comparing an in-window event against its stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupDecision {
    /// No record exists for this identifier.
    New,
    /// A record exists but its last-updated time differs from the event's.
    Changed,
    /// The stored last-updated time matches the event's.
    Unchanged,
}

impl DedupDecision {
    pub fn needs_notification(self) -> bool {
        matches!(self, Self::New | Self::Changed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Staleness filter: an event whose last-updated time is at least one
/// lookback window in the past is outside the operator's interest window,
/// regardless of store state. The store is not consulted for stale events.
pub fn is_stale(event: &HealthEvent, now: DateTime<Utc>, lookback: Duration) -> bool {
    let age = now.signed_duration_since(event.last_updated_time);
    let window = chrono::Duration::from_std(lookback).unwrap_or(chrono::Duration::MAX);
    age >= window
}

/// Compare an event against the stored record (if any) for its identifier.
pub fn evaluate(event: &HealthEvent, existing: Option<&DedupRecord>) -> DedupDecision {
    match existing {
        None => DedupDecision::New,
        Some(record) if record.last_updated_time != event.last_updated_epoch() => {
            DedupDecision::Changed
        }
        Some(_) => DedupDecision::Unchanged,
    }
}
