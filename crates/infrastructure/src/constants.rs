/// Region reported to the feed API when none is configured.
pub const DEFAULT_FEED_REGION: &str = "us-east-1";
