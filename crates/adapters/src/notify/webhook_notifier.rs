use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use domain::notify::entity::NotificationMessage;
use domain::notify::error::NotifyError;
use ports::secondary::notifier::Notifier;

/// Notifier that POSTs the alert payload to a chat webhook URL.
///
/// Single attempt, no retry: the webhook is a best-effort channel and the
/// caller logs and swallows failures.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::HTTP_TIMEOUT_SECS))
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| NotifyError::RequestFailed(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    async fn do_notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let body =
            serde_json::to_string(message).map_err(|e| NotifyError::Serialize(e.to_string()))?;

        let response = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), "notification delivered");
        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn notify<'a>(
        &'a self,
        message: &'a NotificationMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>> {
        Box::pin(self.do_notify(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use domain::enrichment::entity::EnrichmentContext;
    use domain::event::entity::{EventArn, HealthEvent};

    fn sample_message() -> NotificationMessage {
        let event = HealthEvent {
            arn: EventArn::from("arn:test:event/one"),
            event_type_code: "ISSUE".to_string(),
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            status_code: "open".to_string(),
            start_time: DateTime::from_timestamp(1_699_990_000, 0).unwrap(),
            end_time: None,
            last_updated_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let ctx = EnrichmentContext {
            accounts: vec!["111111111111".to_string()],
            entities: vec!["i-abc".to_string()],
            description: "update".to_string(),
        };
        NotificationMessage::build(&event, &ctx, DateTime::from_timestamp(1_700_000_100, 0).unwrap())
    }

    #[tokio::test]
    async fn unreachable_webhook_reports_request_failure() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:1/hook".to_string()).unwrap();
        let result = notifier.notify(&sample_message()).await;
        assert!(matches!(result, Err(NotifyError::RequestFailed(_))));
    }

    #[test]
    fn webhook_notifier_is_send_sync() {
        fn _assert<T: Send + Sync>() {}
        _assert::<WebhookNotifier>();
    }
}
