use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_RETRIES: u32 = 1;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/115.0 Safari/537.36";

/// Source of raw screener markup.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    http: reqwest::Client,
    user_agent: String,
    retries: u32,
}

impl HttpPageFetcher {
    pub fn from_env() -> Result<Self> {
        let timeout_secs = std::env::var("SCREENER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("SCREENER_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let user_agent = std::env::var("SCREENER_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Self::new(Duration::from_secs(timeout_secs), retries, user_agent)
    }

    pub fn new(timeout: Duration, retries: u32, user_agent: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build screener http client")?;

        Ok(Self {
            http,
            user_agent,
            retries: retries.max(1),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));
        Ok(headers)
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let res = self
            .http
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .with_context(|| format!("screener request failed: {url}"))?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("screener HTTP {status}: {url}");
        }

        res.text()
            .await
            .context("failed to read screener response body")
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!(url, attempt, bytes = body.len(), "fetched screener page");
                    return Ok(body);
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(
                        attempt,
                        ?backoff,
                        error = %err,
                        "screener fetch failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
