/// Shown in place of an empty affected-account set: the event applies to
/// every account in the region.
pub const ALL_ACCOUNTS_SENTINEL: &str = "All accounts\nin region";

/// Shown when no per-resource detail is available for the event.
pub const ALL_RESOURCES_SENTINEL: &str = "All resources\nin region";

/// Everything resolved for one event before formatting: affected accounts,
/// affected entities, and the latest human-readable description.
///
/// Both sequences preserve feed order. An empty account set is meaningful
/// (organization-wide scope) rather than missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentContext {
    pub accounts: Vec<String>,
    pub entities: Vec<String>,
    pub description: String,
}

impl EnrichmentContext {
    /// Newline-joined account list, or the all-accounts sentinel.
    pub fn accounts_display(&self) -> String {
        if self.accounts.is_empty() {
            ALL_ACCOUNTS_SENTINEL.to_string()
        } else {
            self.accounts.join("\n")
        }
    }

    /// Newline-joined entity list, or the all-resources sentinel.
    pub fn entities_display(&self) -> String {
        if self.entities.is_empty() {
            ALL_RESOURCES_SENTINEL.to_string()
        } else {
            self.entities.join("\n")
        }
    }
}

/// One page of affected account identifiers.
#[derive(Debug, Clone, Default)]
pub struct AccountPage {
    pub accounts: Vec<String>,
    pub next_token: Option<String>,
}

/// One page of affected resource identifiers.
#[derive(Debug, Clone, Default)]
pub struct EntityPage {
    pub entities: Vec<String>,
    pub next_token: Option<String>,
}

/// Latest detail for an event, from the first successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetail {
    pub latest_description: String,
}
