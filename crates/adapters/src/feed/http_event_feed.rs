use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use application::retry::{RetryConfig, retry_with_backoff};
use domain::common::error::PipelineError;
use domain::event::entity::{self, EventPage, HealthEvent, RegionFilter};
use domain::event::error::{EventError, FeedError};
use ports::secondary::event_feed::EventFeed;
use serde::{Deserialize, Serialize};

/// HTTP client for the organization health-event feed.
///
/// Pagination is token-based; region scoping goes in the request body.
/// Retries are handled here with the elevated org-API ceiling — callers
/// see a `FeedError` only once retries are exhausted.
pub struct HttpEventFeed {
    client: reqwest::Client,
    base_url: String,
    operating_region: String,
    auth_header: Option<String>,
    retry: RetryConfig,
}

#[derive(Serialize)]
struct EventsRequest<'a> {
    filter: EventsFilter<'a>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Serialize)]
struct EventsFilter<'a> {
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    regions: &'a [String],
}

#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<EventDto>,
    #[serde(rename = "nextToken")]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct EventDto {
    arn: String,
    #[serde(rename = "eventTypeCode")]
    event_type_code: String,
    service: String,
    region: String,
    #[serde(rename = "statusCode")]
    status_code: String,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "endTime")]
    end_time: Option<String>,
    #[serde(rename = "lastUpdatedTime")]
    last_updated_time: String,
}

impl EventDto {
    /// Typed conversion: timestamp parsing is a first-class step with a
    /// defined error, not a silent string coercion.
    fn into_event(self) -> Result<HealthEvent, EventError> {
        Ok(HealthEvent {
            start_time: entity::parse_timestamp("startTime", &self.start_time)?,
            end_time: self
                .end_time
                .as_deref()
                .map(|v| entity::parse_timestamp("endTime", v))
                .transpose()?,
            last_updated_time: entity::parse_timestamp(
                "lastUpdatedTime",
                &self.last_updated_time,
            )?,
            arn: domain::event::entity::EventArn(self.arn),
            event_type_code: self.event_type_code,
            service: self.service,
            region: self.region,
            status_code: self.status_code,
        })
    }
}

impl HttpEventFeed {
    pub fn new(
        base_url: String,
        operating_region: String,
        auth_header: Option<String>,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::HTTP_TIMEOUT_SECS))
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| FeedError::RequestFailed(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            client,
            base_url,
            operating_region,
            auth_header,
            retry: RetryConfig::org_api(),
        })
    }

    /// Override the retry policy (for testing).
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_page(
        &self,
        filter: &RegionFilter,
        page_token: Option<&str>,
    ) -> Result<EventPage, FeedError> {
        let url = format!("{}/events", self.base_url);
        let body = EventsRequest {
            filter: EventsFilter {
                regions: filter.regions(),
            },
            next_token: page_token,
        };

        let mut request = self
            .client
            .post(&url)
            .header("x-operating-region", &self.operating_region)
            .json(&body);
        if let Some(ref auth) = self.auth_header
            && let Some((name, value)) = auth.split_once(':')
        {
            request = request.header(name.trim(), value.trim());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        let decoded: EventsResponse = response
            .json()
            .await
            .map_err(|e| FeedError::DecodeFailed(e.to_string()))?;

        let mut events = Vec::with_capacity(decoded.events.len());
        for dto in decoded.events {
            let arn = dto.arn.clone();
            match dto.into_event() {
                Ok(event) => events.push(event),
                Err(e) => {
                    // One malformed event must not sink the page; the
                    // event simply cannot be evaluated this poll.
                    let err = PipelineError::from(e);
                    tracing::warn!(arn = %arn, error = %err, "event dropped from page");
                }
            }
        }

        Ok(EventPage {
            events,
            next_token: decoded.next_token,
        })
    }
}

impl EventFeed for HttpEventFeed {
    fn poll_events<'a>(
        &'a self,
        filter: &'a RegionFilter,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<EventPage, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            retry_with_backoff(&self.retry, || self.fetch_page(filter, page_token)).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(last_updated: &str) -> EventDto {
        EventDto {
            arn: "arn:test:event/one".to_string(),
            event_type_code: "AWS_EC2_OPERATIONAL_ISSUE".to_string(),
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            status_code: "open".to_string(),
            start_time: "1699990000".to_string(),
            end_time: None,
            last_updated_time: last_updated.to_string(),
        }
    }

    #[test]
    fn dto_converts_epoch_timestamps() {
        let event = dto("1700000000").into_event().unwrap();
        assert_eq!(event.last_updated_time.timestamp(), 1_700_000_000);
        assert_eq!(event.start_time.timestamp(), 1_699_990_000);
        assert!(event.end_time.is_none());
        assert_eq!(event.service, "EC2");
    }

    #[test]
    fn dto_converts_rfc3339_timestamps() {
        let mut d = dto("2023-11-14T22:13:20Z");
        d.end_time = Some("2023-11-14T23:13:20Z".to_string());
        let event = d.into_event().unwrap();
        assert_eq!(event.last_updated_time.timestamp(), 1_700_000_000);
        assert_eq!(event.end_time.unwrap().timestamp(), 1_700_003_600);
    }

    #[test]
    fn dto_malformed_timestamp_is_error() {
        let err = dto("not-a-time").into_event().unwrap_err();
        assert!(matches!(err, EventError::MalformedTimestamp { .. }));
    }

    #[test]
    fn request_body_omits_empty_region_filter() {
        let filter = RegionFilter::default();
        let body = EventsRequest {
            filter: EventsFilter {
                regions: filter.regions(),
            },
            next_token: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["filter"].get("regions").is_none());
        assert!(json.get("nextToken").is_none());
    }

    #[test]
    fn request_body_carries_regions_and_token() {
        let filter = RegionFilter::new(vec!["us-east-1".to_string()]);
        let body = EventsRequest {
            filter: EventsFilter {
                regions: filter.regions(),
            },
            next_token: Some("abc"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["filter"]["regions"][0], "us-east-1");
        assert_eq!(json["nextToken"], "abc");
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_feed_error() {
        let feed = HttpEventFeed::new(
            "http://127.0.0.1:1".to_string(),
            "us-east-1".to_string(),
            None,
        )
        .unwrap()
        .with_retry(RetryConfig {
            max_retries: 0,
            backoff_schedule: vec![Duration::from_millis(1)],
        });

        let result = feed.poll_events(&RegionFilter::default(), None).await;
        assert!(matches!(result, Err(FeedError::RequestFailed(_))));
    }

    #[test]
    fn http_event_feed_is_send_sync() {
        fn _assert<T: Send + Sync>() {}
        _assert::<HttpEventFeed>();
    }
}
