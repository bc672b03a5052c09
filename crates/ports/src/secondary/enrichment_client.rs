use std::future::Future;
use std::pin::Pin;

use domain::enrichment::entity::{AccountPage, EntityPage, EventDetail};
use domain::enrichment::error::EnrichmentError;
use domain::event::entity::EventArn;

/// Secondary port for resolving an event into affected accounts, affected
/// entities, and its latest description.
///
/// All three calls hit the same organization-scoped API family; the
/// aggregation sequencing (accounts first, entities scoped to one account,
/// detail last) lives in the application layer, not here.
pub trait EnrichmentClient: Send + Sync {
    /// One page of account identifiers affected by the event.
    fn affected_accounts<'a>(
        &'a self,
        arn: &'a EventArn,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<AccountPage, EnrichmentError>> + Send + 'a>>;

    /// One page of resource identifiers affected by the event, scoped to
    /// a single account.
    fn affected_entities<'a>(
        &'a self,
        arn: &'a EventArn,
        account: &'a str,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<EntityPage, EnrichmentError>> + Send + 'a>>;

    /// Latest detail for the event, optionally filtered by one account.
    /// `Ok(None)` means the call succeeded but no successful result came
    /// back for this event.
    fn event_detail<'a>(
        &'a self,
        arn: &'a EventArn,
        account: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<EventDetail>, EnrichmentError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyClient;
    impl EnrichmentClient for EmptyClient {
        fn affected_accounts<'a>(
            &'a self,
            _arn: &'a EventArn,
            _page_token: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<AccountPage, EnrichmentError>> + Send + 'a>>
        {
            Box::pin(async { Ok(AccountPage::default()) })
        }

        fn affected_entities<'a>(
            &'a self,
            _arn: &'a EventArn,
            _account: &'a str,
            _page_token: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<EntityPage, EnrichmentError>> + Send + 'a>>
        {
            Box::pin(async { Ok(EntityPage::default()) })
        }

        fn event_detail<'a>(
            &'a self,
            _arn: &'a EventArn,
            _account: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<Option<EventDetail>, EnrichmentError>> + Send + 'a>>
        {
            Box::pin(async { Ok(None) })
        }
    }

    #[test]
    fn enrichment_client_is_dyn_compatible() {
        let client: Box<dyn EnrichmentClient> = Box::new(EmptyClient);
        let _ = client;
    }
}
