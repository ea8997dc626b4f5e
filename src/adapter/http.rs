//! Shared HTTP plumbing for the REST adapters.
//!
//! Both upstream APIs are quota-limited, so every request goes through a
//! [`Throttle`] that enforces a minimum spacing, and transient transport
//! failures get a bounded number of retries.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::Result;

/// HTTP client settings shared by the adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures (1 = no retry).
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_http_retry_max_attempts() -> u32 {
    1
}

const fn default_http_retry_backoff_ms() -> u64 {
    1_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

/// Enforces a minimum interval between consecutive requests.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Sleep until the interval since the previous call has passed.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Raw response: status and body text, decoded by the caller.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Throttled GET client with bounded retries.
pub struct HttpTransport {
    http: HttpClient,
    throttle: Throttle,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
    service: &'static str,
}

impl HttpTransport {
    /// Build a transport for `service`, spacing requests by `interval`.
    #[must_use]
    pub fn new(service: &'static str, config: &HttpConfig, interval: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(service, error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            throttle: Throttle::new(interval),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
            service,
        }
    }

    /// GET `url` with query parameters.
    ///
    /// Non-2xx statuses are returned, not raised; the adapters know how to
    /// read their API's error bodies.
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            self.throttle.wait().await;

            let sent = self.http.get(url).query(query).send().await;
            let result = match sent {
                Ok(response) => {
                    let status = response.status();
                    response.text().await.map(|body| RawResponse { status, body })
                }
                Err(err) => Err(err),
            };

            match result {
                Ok(raw) => {
                    debug!(service = self.service, status = %raw.status, "HTTP response");
                    return Ok(raw);
                }
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            service = self.service,
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}
