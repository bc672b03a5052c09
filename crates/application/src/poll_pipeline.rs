use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::common::error::PipelineError;
use domain::dedup::engine;
use domain::dedup::entity::DedupRecord;
use domain::event::entity::{HealthEvent, RegionFilter};
use domain::notify::entity::NotificationMessage;
use ports::secondary::event_feed::EventFeed;
use ports::secondary::notifier::Notifier;
use ports::secondary::record_store::RecordStore;

use crate::enrichment::EnrichmentAggregator;

/// Per-event accounting for one poll pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub seen: usize,
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// One-shot orchestrator over the whole feed.
///
/// Drives pages strictly sequentially, applies the dedup decision per
/// event, and triggers enrichment + dispatch when needed. The dedup
/// record is written BEFORE enrichment so a crash mid-enrichment cannot
/// retry-storm the same event on the next poll: at-most-once notification
/// is favored over guaranteed delivery.
pub struct PollPipeline {
    feed: Arc<dyn EventFeed>,
    store: Arc<dyn RecordStore>,
    enrichment: EnrichmentAggregator,
    notifier: Arc<dyn Notifier>,
    lookback: Duration,
    region_filter: RegionFilter,
}

impl PollPipeline {
    pub fn new(
        feed: Arc<dyn EventFeed>,
        store: Arc<dyn RecordStore>,
        enrichment: EnrichmentAggregator,
        notifier: Arc<dyn Notifier>,
        lookback: Duration,
        region_filter: RegionFilter,
    ) -> Self {
        Self {
            feed,
            store,
            enrichment,
            notifier,
            lookback,
            region_filter,
        }
    }

    /// Run one full pass over the feed.
    ///
    /// Only feed pagination failure aborts the pass (no dedup writes exist
    /// for unfetched pages, so nothing is corrupted). Per-event failures
    /// are logged and counted, never propagated.
    pub async fn run_once(&self) -> Result<RunSummary, PipelineError> {
        // TTL enforcement lives in the store; give it a chance to reap
        // before decisions are made against stale records.
        match self.store.sweep_expired(Utc::now().timestamp()) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "swept expired dedup records"),
            Err(e) => tracing::warn!(error = %e, "dedup record sweep failed"),
        }

        let mut summary = RunSummary::default();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .feed
                .poll_events(&self.region_filter, page_token.as_deref())
                .await?;
            tracing::debug!(events = page.events.len(), "feed page received");

            for event in &page.events {
                self.process_event(event, &mut summary).await;
            }

            match page.next_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            seen = summary.seen,
            notified = summary.notified,
            skipped = summary.skipped,
            failed = summary.failed,
            "poll pass complete"
        );
        Ok(summary)
    }

    async fn process_event(&self, event: &HealthEvent, summary: &mut RunSummary) {
        summary.seen += 1;
        let now = Utc::now();

        // Staleness filter comes first; the store is not consulted for
        // events outside the lookback window.
        if engine::is_stale(event, now, self.lookback) {
            tracing::debug!(arn = %event.arn, "event older than lookback window, skipped");
            summary.skipped += 1;
            return;
        }

        let existing = match self.store.get(event.arn.as_str()) {
            Ok(record) => record,
            Err(e) => {
                // Skip this event only; it is NOT marked notified, so the
                // next poll re-evaluates it.
                let err = PipelineError::from(e);
                tracing::warn!(arn = %event.arn, error = %err, "dedup store read failed, event skipped");
                summary.failed += 1;
                return;
            }
        };

        let decision = engine::evaluate(event, existing.as_ref());
        if !decision.needs_notification() {
            tracing::debug!(arn = %event.arn, "event unchanged since last notification");
            summary.skipped += 1;
            return;
        }

        // Record first, notify second. If anything past this point fails,
        // the event will not be retried on the next poll.
        let record = DedupRecord::for_event(event, now, self.lookback);
        if let Err(e) = self.store.put(&record) {
            let err = PipelineError::from(e);
            tracing::warn!(arn = %event.arn, error = %err, "dedup store write failed, event skipped");
            summary.failed += 1;
            return;
        }

        tracing::info!(
            arn = %event.arn,
            reason = decision.as_str(),
            service = %event.service,
            region = %event.region,
            status = %event.status_code,
            "event needs notification"
        );

        let ctx = match self.enrichment.enrich(&event.arn).await {
            Ok(ctx) => ctx,
            Err(e) => {
                let err = PipelineError::EnrichmentFailed {
                    arn: event.arn.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(error = %err, "notification abandoned");
                summary.failed += 1;
                return;
            }
        };

        let message = NotificationMessage::build(event, &ctx, Utc::now());
        if let Err(e) = self.notifier.notify(&message).await {
            // Best-effort channel: delivery failure does not roll back the
            // dedup record.
            let err = PipelineError::from(e);
            tracing::warn!(arn = %event.arn, error = %err, "delivery failed, alert dropped");
            summary.failed += 1;
            return;
        }

        summary.notified += 1;
    }
}
