pub mod http_enrichment_client;
