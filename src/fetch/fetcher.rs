//! Bounded-retry fetching on top of a [`Transport`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::time::timeout;

use crate::fetch::error::{FetchError, TransportError};
use crate::fetch::transport::Transport;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Issues GETs with the configured attempt budget.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch a body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url, Ok).await
    }

    /// Fetch a body and deserialize it as JSON.
    ///
    /// A body that does not parse fails the attempt like a bad status would,
    /// so it is retried within the same budget.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch(url, |body| {
            serde_json::from_str(&body).map_err(|e| TransportError::Json(e.to_string()))
        })
        .await
    }

    async fn fetch<T, P>(&self, url: &str, parse: P) -> Result<T, FetchError>
    where
        P: Fn(String) -> Result<T, TransportError>,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = match timeout(self.policy.attempt_timeout, self.transport.get(url)).await
            {
                Ok(Ok(body)) => parse(body),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(TransportError::Timeout(self.policy.attempt_timeout)),
            };

            match outcome {
                Ok(value) => {
                    tracing::debug!(url = %url, attempt, "Upstream fetch succeeded");
                    metrics::record_upstream_fetch("success");
                    return Ok(value);
                }
                Err(cause) if attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    tracing::warn!(
                        url = %url,
                        attempt,
                        delay = ?delay,
                        error = %cause,
                        "Upstream attempt failed, retrying"
                    );
                    metrics::record_upstream_fetch("retry");
                    tokio::time::sleep(delay).await;
                }
                Err(cause) => {
                    tracing::error!(url = %url, attempts = attempt, error = %cause, "Upstream fetch failed");
                    metrics::record_upstream_fetch("failure");
                    return Err(FetchError {
                        url: url.to_string(),
                        attempts: attempt,
                        cause,
                    });
                }
            }
        }
    }
}
