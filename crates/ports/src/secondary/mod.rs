pub mod enrichment_client;
pub mod event_feed;
pub mod notifier;
pub mod record_store;
pub mod secret_decryptor;
