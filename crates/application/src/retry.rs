use std::time::Duration;

/// Configuration for retry with exponential backoff.
///
/// Per-attempt timeouts are the HTTP client's responsibility; this helper
/// only sequences attempts and sleeps between them.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (after the initial attempt).
    pub max_retries: usize,
    /// Backoff delays between retries. If fewer entries than `max_retries`,
    /// the last entry is repeated.
    pub backoff_schedule: Vec<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_schedule: vec![
                Duration::from_secs(1),
                Duration::from_secs(5),
                Duration::from_secs(30),
            ],
        }
    }
}

impl RetryConfig {
    /// Retry policy for the organization-wide APIs, which have a lower
    /// throughput ceiling than the per-account ones: a higher retry
    /// ceiling than the generic default.
    pub fn org_api() -> Self {
        Self {
            max_retries: 10,
            backoff_schedule: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(30),
            ],
        }
    }

    fn backoff_for(&self, attempt: usize) -> Duration {
        self.backoff_schedule
            .get(attempt)
            .copied()
            .unwrap_or_else(|| {
                self.backoff_schedule
                    .last()
                    .copied()
                    .unwrap_or(Duration::from_secs(1))
            })
    }
}

/// Execute an async operation with retry and backoff.
///
/// The closure `f` is called up to `1 + max_retries` times. On failure,
/// the function sleeps for the backoff duration before retrying; the last
/// error is returned once attempts are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(config: &RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= config.max_retries {
                    return Err(e);
                }
                tokio::time::sleep(config.backoff_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            backoff_schedule: vec![Duration::from_millis(1)],
        }
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<u32, &str> = retry_with_backoff(&fast(3), || {
            calls_clone.fetch_add(1, Ordering::Relaxed);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn succeeds_after_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<&str, &str> = retry_with_backoff(&fast(3), || {
            let attempt = calls_clone.fetch_add(1, Ordering::Relaxed);
            async move {
                if attempt < 2 {
                    Err("transient")
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn all_retries_exhausted_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<(), String> = retry_with_backoff(&fast(2), || {
            let attempt = calls_clone.fetch_add(1, Ordering::Relaxed);
            async move { Err(format!("attempt {attempt}")) }
        })
        .await;

        // 1 initial + 2 retries = 3 total
        assert_eq!(calls.load(Ordering::Relaxed), 3);
        assert_eq!(result.unwrap_err(), "attempt 2");
    }

    #[tokio::test]
    async fn backoff_schedule_respected() {
        let config = RetryConfig {
            max_retries: 2,
            backoff_schedule: vec![Duration::from_millis(50), Duration::from_millis(100)],
        };

        let start = tokio::time::Instant::now();
        let _: Result<(), &str> = retry_with_backoff(&config, || async { Err("fail") }).await;
        let elapsed = start.elapsed();

        // Should have waited at least 50ms + 100ms = 150ms
        assert!(
            elapsed >= Duration::from_millis(140),
            "elapsed: {elapsed:?}"
        );
    }

    #[test]
    fn org_api_ceiling_is_higher_than_default() {
        assert!(RetryConfig::org_api().max_retries > RetryConfig::default().max_retries);
    }

    #[test]
    fn backoff_repeats_last_entry() {
        let config = RetryConfig {
            max_retries: 5,
            backoff_schedule: vec![Duration::from_millis(10), Duration::from_millis(20)],
        };
        assert_eq!(config.backoff_for(0), Duration::from_millis(10));
        assert_eq!(config.backoff_for(1), Duration::from_millis(20));
        assert_eq!(config.backoff_for(4), Duration::from_millis(20));
    }
}
