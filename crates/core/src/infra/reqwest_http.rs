//! Reqwest-backed HTTP client implementing the `Http` port; maps reqwest
//! errors and statuses into `FetchError`.
use std::time::Duration;

use reqwest::header;
use tracing::{debug, warn};

use crate::domain::model::{FetchError, GetResult};
use crate::ports::http::Http;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    /// Every request is bounded by `timeout`, connect included.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(120))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn classify_error(e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectionFailure
        } else {
            FetchError::Unexpected(e.to_string())
        }
    }
}

#[async_trait::async_trait]
impl Http for ReqwestHttp {
    async fn get(&self, url: &str) -> GetResult {
        let start = tokio::time::Instant::now();
        debug!(url, "HTTP GET start");
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let (body, error) = match resp.bytes().await {
                    Ok(b) => (Some(b.to_vec()), None),
                    Err(e) => {
                        warn!(url, error = %e, "Failed reading body");
                        (None, Some(FetchError::Body(e.to_string())))
                    }
                };
                GetResult {
                    status: Some(status),
                    body,
                    error,
                    latency_ms: start.elapsed().as_millis() as u64,
                }
            }
            Err(e) => {
                warn!(url, error = %e, "HTTP GET failed");
                GetResult {
                    status: None,
                    body: None,
                    error: Some(Self::classify_error(&e)),
                    latency_ms: start.elapsed().as_millis() as u64,
                }
            }
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Self::classify_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}
