use std::future::Future;
use std::pin::Pin;

use domain::event::entity::{EventPage, RegionFilter};
use domain::event::error::FeedError;

/// Secondary port for pulling pages from the organization health feed.
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the trait
/// is dyn-compatible and can be used as `Arc<dyn EventFeed>`.
///
/// Retry policy belongs to the implementation; a `FeedError` here means
/// retries are already exhausted and the invocation should fail.
pub trait EventFeed: Send + Sync {
    /// Fetch one page of events, scoped by `filter`. Pass back the page's
    /// `next_token` to continue; `None` starts from the beginning.
    fn poll_events<'a>(
        &'a self,
        filter: &'a RegionFilter,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<EventPage, FeedError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyFeed;
    impl EventFeed for EmptyFeed {
        fn poll_events<'a>(
            &'a self,
            _filter: &'a RegionFilter,
            _page_token: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<EventPage, FeedError>> + Send + 'a>> {
            Box::pin(async { Ok(EventPage::default()) })
        }
    }

    #[test]
    fn event_feed_is_dyn_compatible() {
        let feed: Box<dyn EventFeed> = Box::new(EmptyFeed);
        let _ = feed;
    }
}
