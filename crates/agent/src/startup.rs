use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use adapters::enrichment::http_enrichment_client::HttpEnrichmentClient;
use adapters::feed::http_event_feed::HttpEventFeed;
use adapters::notify::webhook_notifier::WebhookNotifier;
use adapters::secrets::http_secret_decryptor::HttpSecretDecryptor;
use adapters::storage::redb_record_store::RedbRecordStore;
use application::enrichment::EnrichmentAggregator;
use application::poll_pipeline::PollPipeline;
use domain::common::error::PipelineError;
use domain::event::entity::RegionFilter;
use infrastructure::config::AgentConfig;
use infrastructure::logging::init_logging;
use ports::secondary::secret_decryptor::SecretDecryptor;
use tracing::info;

/// Run one full poll pass and exit.
pub async fn run() -> anyhow::Result<()> {
    // ── 1. Load config ──────────────────────────────────────────────
    let config = AgentConfig::from_env()?;

    // ── 2. Initialize logging ───────────────────────────────────────
    init_logging(config.log_level, config.log_format);

    // Service root span — fields appear in every subsequent log entry
    let _root_span = tracing::span!(
        tracing::Level::INFO,
        "service",
        service.name = "healthwatch",
        service.version = env!("CARGO_PKG_VERSION"),
    )
    .entered();

    info!(
        lookback_hours = config.lookback_hours,
        regions = ?config.regions,
        feed_region = %config.feed_region,
        log_level = config.log_level.as_str(),
        log_format = config.log_format.as_str(),
        "healthwatch agent starting"
    );

    // ── 3. Decrypt the webhook secret ───────────────────────────────
    // Fatal on failure: no delivery target means nothing to do.
    let decryptor = HttpSecretDecryptor::new(config.decrypt_endpoint.clone())?;
    let plaintext = decryptor
        .decrypt(&config.encrypted_webhook)
        .await
        .map_err(PipelineError::from)?;
    let webhook_url = format!("https://{plaintext}");

    // ── 4. Wire adapters ────────────────────────────────────────────
    let store = Arc::new(RedbRecordStore::open(Path::new(&config.store_path))?);
    let feed = Arc::new(HttpEventFeed::new(
        config.feed_endpoint.clone(),
        config.feed_region.clone(),
        config.feed_auth_header.clone(),
    )?);
    let enrichment_client = Arc::new(HttpEnrichmentClient::new(
        config.feed_endpoint.clone(),
        config.feed_auth_header.clone(),
    )?);
    let notifier = Arc::new(WebhookNotifier::new(webhook_url)?);

    // ── 5. Run the pipeline ─────────────────────────────────────────
    let pipeline = PollPipeline::new(
        feed,
        store,
        EnrichmentAggregator::new(enrichment_client),
        notifier,
        Duration::from_secs(config.lookback_hours * 3600),
        RegionFilter::new(config.regions.clone()),
    );

    // run_once logs the full pass summary itself.
    let summary = pipeline.run_once().await?;

    info!(notified = summary.notified, "agent exiting");

    Ok(())
}
