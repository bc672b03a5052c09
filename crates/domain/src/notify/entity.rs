use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::enrichment::entity::EnrichmentContext;
use crate::event::entity::HealthEvent;

/// Title posted with every alert.
pub const ALERT_TITLE: &str =
    "*:rotating_light: Operational Health Org View Alert :rotating_light:*";

/// Display format for every timestamp in the alert body (UTC).
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered when the event carries no end time.
pub const NO_END_TIME: &str = "None given";

/// One labeled field of the outgoing alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// One attachment block in the webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub fields: Vec<MessageField>,
}

/// The full webhook payload, constructed fresh per dispatch and never
/// persisted. Serializes directly to the chat service's expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl NotificationMessage {
    /// Build the alert for one event with its enrichment context.
    ///
    /// Field order is fixed: Account(s), Resource(s), Service, Region,
    /// Start Time, End Time, Posted Time, Status, Updates.
    pub fn build(event: &HealthEvent, ctx: &EnrichmentContext, posted: DateTime<Utc>) -> Self {
        let fmt = |t: DateTime<Utc>| t.format(DISPLAY_TIME_FORMAT).to_string();
        let end_time = event.end_time.map_or_else(|| NO_END_TIME.to_string(), fmt);

        let field = |title: &str, value: String, short: bool| MessageField {
            title: title.to_string(),
            value,
            short,
        };

        let fields = vec![
            field("Account(s)", ctx.accounts_display(), true),
            field("Resource(s)", ctx.entities_display(), true),
            field("Service", event.service.clone(), true),
            field("Region", event.region.clone(), true),
            field("Start Time (UTC)", fmt(event.start_time), true),
            field("End Time (UTC)", end_time, true),
            field("Posted Time (UTC)", fmt(posted), true),
            field("Status", event.status_code.clone(), true),
            field("Updates", ctx.description.clone(), false),
        ];

        Self {
            text: ALERT_TITLE.to_string(),
            attachments: vec![Attachment {
                color: "danger".to_string(),
                fields,
            }],
        }
    }

    /// Look up a field value by title. Intended for assertions and log
    /// summaries, not for consumers of the wire payload.
    pub fn field_value(&self, title: &str) -> Option<&str> {
        self.attachments
            .iter()
            .flat_map(|a| &a.fields)
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}
