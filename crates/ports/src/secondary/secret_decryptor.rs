use std::future::Future;
use std::pin::Pin;

use domain::common::error::SecretError;

/// Secondary port for decrypting the webhook secret.
///
/// Called exactly once at startup, before any event processing; failure
/// aborts the whole invocation.
pub trait SecretDecryptor: Send + Sync {
    /// Decrypt a base64 ciphertext into its plaintext.
    fn decrypt<'a>(
        &'a self,
        ciphertext_b64: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SecretError>> + Send + 'a>>;
}
