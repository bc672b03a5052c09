pub mod http_event_feed;
