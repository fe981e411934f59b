use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::RETRY_AFTER;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use spotter_core::BackendConfig;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{LookupError, Result};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ─── RateLimitedClient ────────────────────────────────────────────────────────

/// Backend client shared by every lookup. Requests are spaced at least
/// `min_interval` apart; transport errors and 429s are retried.
pub struct RateLimitedClient {
    client: reqwest::Client,
    base_url: Url,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(
        base_url: &str,
        min_interval: Duration,
        max_retries: u32,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
            max_retries,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.min_interval_ms),
            config.max_retries,
            &config.user_agent,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` with `segments` appended to its path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| LookupError::Parse(format!("invalid base URL {}", self.base_url)))?;
            segs.pop_if_empty();
            segs.extend(segments);
        }
        Ok(url)
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn get(&self, url: &Url) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            self.wait_for_rate_limit().await;
            let resp = self.client.get(url.clone()).send().await;
            match resp {
                Ok(r) if r.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let wait = r
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    if attempt >= self.max_retries {
                        return Err(LookupError::RateLimit(host_of(url), wait));
                    }
                    tracing::warn!(%url, wait, "rate limited by backend");
                    sleep(Duration::from_secs(wait)).await;
                    attempt += 1;
                }
                Ok(r) if r.status() == StatusCode::NOT_FOUND => {
                    return Err(LookupError::NotFound(url.path().to_string()));
                }
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    let body = r.text().await.unwrap_or_default();
                    return Err(LookupError::Api(
                        url.to_string(),
                        format!("HTTP {status}: {body}"),
                    ));
                }
                Ok(r) => return r.text().await.map_err(LookupError::Http),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(LookupError::Http(e));
                    }
                    let backoff = 2u64.pow(attempt);
                    tracing::warn!(%url, attempt, error = %e, "request failed, retrying in {backoff}s");
                    sleep(Duration::from_secs(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let text = self.get(url).await?;
        serde_json::from_str(&text).map_err(|e| LookupError::Parse(e.to_string()))
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url).map_err(|e| LookupError::Parse(format!("invalid URL {base_url}: {e}")))
}

fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or("backend").to_string()
}

#[cfg(test)]
pub(crate) fn client_for_tests(base_url: &str) -> RateLimitedClient {
    RateLimitedClient::new(base_url, Duration::from_millis(1), 0, "spotter-tests")
        .unwrap_or_else(|e| panic!("test client: {e}"))
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client_for_tests("http://localhost:8080/");
        let url = client.endpoint(&["api", "lookup", "airports", "LPPT"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/lookup/airports/LPPT");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for_tests("https://example.org/logbook");
        let url = client.endpoint(&["api", "lookup"]).unwrap();
        assert_eq!(url.as_str(), "https://example.org/logbook/api/lookup");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = RateLimitedClient::new("not a url", Duration::ZERO, 0, "x");
        assert!(matches!(result, Err(LookupError::Parse(_))));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/airports")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = client_for_tests(&server.url());
        let url = client.endpoint(&["api", "lookup", "airports"]).unwrap();
        let err = client.get(&url).await.unwrap_err();
        match err {
            LookupError::Api(_, msg) => assert_eq!(msg, "HTTP 503: maintenance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_without_retries_left() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/aircraft")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let client = client_for_tests(&server.url());
        let url = client.endpoint(&["api", "lookup", "aircraft"]).unwrap();
        let err = client.get(&url).await.unwrap_err();
        assert!(matches!(err, LookupError::RateLimit(_, 7)));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_get_json_parse_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/airports")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = client_for_tests(&server.url());
        let url = client.endpoint(&["api", "lookup", "airports"]).unwrap();
        let result: Result<Vec<serde_json::Value>> = client.get_json(&url).await;
        assert!(matches!(result, Err(LookupError::Parse(_))));
    }
}
