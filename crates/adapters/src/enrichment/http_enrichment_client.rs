use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use application::retry::{RetryConfig, retry_with_backoff};
use domain::enrichment::entity::{AccountPage, EntityPage, EventDetail};
use domain::enrichment::error::EnrichmentError;
use domain::event::entity::EventArn;
use ports::secondary::enrichment_client::EnrichmentClient;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// HTTP client for the organization-scoped enrichment endpoints:
/// affected accounts, affected entities, and event details.
///
/// Shares the feed's elevated retry ceiling — these are the same
/// low-throughput org-wide API family.
pub struct HttpEnrichmentClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<String>,
    retry: RetryConfig,
}

#[derive(Deserialize)]
struct AccountsResponse {
    #[serde(rename = "affectedAccounts", default)]
    affected_accounts: Vec<String>,
    #[serde(rename = "nextToken")]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: Vec<EntityDto>,
    #[serde(rename = "nextToken")]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct EntityDto {
    #[serde(rename = "entityValue")]
    entity_value: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(rename = "successfulSet", default)]
    successful_set: Vec<DetailDto>,
}

#[derive(Deserialize)]
struct DetailDto {
    #[serde(rename = "eventDescription")]
    event_description: DescriptionDto,
}

#[derive(Deserialize)]
struct DescriptionDto {
    #[serde(rename = "latestDescription")]
    latest_description: String,
}

#[derive(Serialize)]
struct EntityFilter<'a> {
    #[serde(rename = "awsAccountId")]
    account_id: &'a str,
    #[serde(rename = "eventArn")]
    event_arn: &'a str,
}

impl HttpEnrichmentClient {
    pub fn new(base_url: String, auth_header: Option<String>) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::HTTP_TIMEOUT_SECS))
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| {
                EnrichmentError::RequestFailed(format!("HTTP client init failed: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
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

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, EnrichmentError> {
        retry_with_backoff(&self.retry, || {
            let body = body.clone();
            async move {
                let mut request = self
                    .client
                    .post(format!("{}{path}", self.base_url))
                    .json(&body);
                if let Some(ref auth) = self.auth_header
                    && let Some((name, value)) = auth.split_once(':')
                {
                    request = request.header(name.trim(), value.trim());
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| EnrichmentError::RequestFailed(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(EnrichmentError::HttpStatus(status.as_u16()));
                }

                response
                    .json::<T>()
                    .await
                    .map_err(|e| EnrichmentError::DecodeFailed(e.to_string()))
            }
        })
        .await
    }
}

impl EnrichmentClient for HttpEnrichmentClient {
    fn affected_accounts<'a>(
        &'a self,
        arn: &'a EventArn,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<AccountPage, EnrichmentError>> + Send + 'a>> {
        Box::pin(async move {
            let mut body = json!({ "eventArn": arn.as_str() });
            if let Some(token) = page_token {
                body["nextToken"] = json!(token);
            }
            let response: AccountsResponse = self.post_json("/affected-accounts", body).await?;
            Ok(AccountPage {
                accounts: response.affected_accounts,
                next_token: response.next_token,
            })
        })
    }

    fn affected_entities<'a>(
        &'a self,
        arn: &'a EventArn,
        account: &'a str,
        page_token: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<EntityPage, EnrichmentError>> + Send + 'a>> {
        Box::pin(async move {
            let filter = EntityFilter {
                account_id: account,
                event_arn: arn.as_str(),
            };
            let mut body = json!({ "entityFilters": [filter] });
            if let Some(token) = page_token {
                body["nextToken"] = json!(token);
            }
            let response: EntitiesResponse = self.post_json("/affected-entities", body).await?;
            Ok(EntityPage {
                entities: response
                    .entities
                    .into_iter()
                    .map(|e| e.entity_value)
                    .collect(),
                next_token: response.next_token,
            })
        })
    }

    fn event_detail<'a>(
        &'a self,
        arn: &'a EventArn,
        account: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<EventDetail>, EnrichmentError>> + Send + 'a>>
    {
        Box::pin(async move {
            // With an account, filter like the entity query; without one,
            // query by event identifier alone.
            let body = match account {
                Some(account) => json!({
                    "detailFilters": [EntityFilter {
                        account_id: account,
                        event_arn: arn.as_str(),
                    }]
                }),
                None => json!({ "eventArns": [arn.as_str()] }),
            };
            let response: DetailsResponse = self.post_json("/event-details", body).await?;
            Ok(response
                .successful_set
                .into_iter()
                .next()
                .map(|d| EventDetail {
                    latest_description: d.event_description.latest_description,
                }))
        })
    }
}
