use std::sync::Arc;

use domain::enrichment::entity::{ALL_RESOURCES_SENTINEL, EnrichmentContext};
use domain::enrichment::error::EnrichmentError;
use domain::event::entity::EventArn;
use ports::secondary::enrichment_client::EnrichmentClient;

/// Resolves one event identifier into its full enrichment context:
/// affected accounts, affected entities, and the latest description.
///
/// Sequencing matters and is fixed here: accounts first (an empty
/// organization-wide list means the event is account-scoped), then
/// entities scoped to exactly the first affected account, then the
/// detail query filtered the same way.
pub struct EnrichmentAggregator {
    client: Arc<dyn EnrichmentClient>,
}

impl EnrichmentAggregator {
    pub fn new(client: Arc<dyn EnrichmentClient>) -> Self {
        Self { client }
    }

    pub async fn enrich(&self, arn: &EventArn) -> Result<EnrichmentContext, EnrichmentError> {
        let accounts = self.fetch_accounts(arn).await?;

        // Entities are scoped to the first affected account only; entities
        // for further accounts are dropped. Kept as-is: the fan-out
        // contract fixes the filter to one account per event.
        let entities = match accounts.first() {
            Some(first) => self.fetch_entities(arn, first).await?,
            None => vec![ALL_RESOURCES_SENTINEL.to_string()],
        };

        let detail = self
            .client
            .event_detail(arn, accounts.first().map(String::as_str))
            .await?;
        let description = detail
            .ok_or_else(|| EnrichmentError::NoDetail(arn.to_string()))?
            .latest_description;

        Ok(EnrichmentContext {
            accounts,
            entities,
            description,
        })
    }

    async fn fetch_accounts(&self, arn: &EventArn) -> Result<Vec<String>, EnrichmentError> {
        let mut accounts = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.client.affected_accounts(arn, token.as_deref()).await?;
            accounts.extend(page.accounts);
            match page.next_token {
                Some(t) => token = Some(t),
                None => break,
            }
        }
        Ok(accounts)
    }

    async fn fetch_entities(
        &self,
        arn: &EventArn,
        account: &str,
    ) -> Result<Vec<String>, EnrichmentError> {
        let mut entities = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .client
                .affected_entities(arn, account, token.as_deref())
                .await?;
            entities.extend(page.entities);
            match page.next_token {
                Some(t) => token = Some(t),
                None => break,
            }
        }
        Ok(entities)
    }
}
