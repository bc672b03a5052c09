use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::common::error::SecretError;
use ports::secondary::secret_decryptor::SecretDecryptor;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct DecryptRequest<'a> {
    #[serde(rename = "ciphertextBlob")]
    ciphertext_blob: &'a str,
}

#[derive(Deserialize)]
struct DecryptResponse {
    plaintext: String,
}

/// Decrypts the webhook ciphertext through an external decrypt endpoint.
///
/// The ciphertext is validated as base64 locally before the request goes
/// out, so an obviously broken configuration fails without a round trip.
pub struct HttpSecretDecryptor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSecretDecryptor {
    pub fn new(endpoint: String) -> Result<Self, SecretError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::HTTP_TIMEOUT_SECS))
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| SecretError::RequestFailed(format!("http client build: {e}")))?;
        Ok(Self { client, endpoint })
    }

    async fn decrypt_inner(&self, ciphertext_b64: &str) -> Result<String, SecretError> {
        BASE64
            .decode(ciphertext_b64)
            .map_err(|e| SecretError::InvalidCiphertext(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&DecryptRequest {
                ciphertext_blob: ciphertext_b64,
            })
            .send()
            .await
            .map_err(|e| SecretError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SecretError::HttpStatus(status.as_u16()));
        }

        let body: DecryptResponse = response
            .json()
            .await
            .map_err(|e| SecretError::RequestFailed(format!("decode response: {e}")))?;

        Ok(body.plaintext)
    }
}

impl SecretDecryptor for HttpSecretDecryptor {
    fn decrypt<'a>(
        &'a self,
        ciphertext_b64: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SecretError>> + Send + 'a>> {
        Box::pin(self.decrypt_inner(ciphertext_b64))
    }
}
