//! The page-fetch seam between the dispatcher and the network.
//!
//! The dispatcher only needs "URL in, HTML out"; everything else about
//! fetching (retries, politeness, redirect policy) belongs to whatever
//! sits behind this trait. [`HttpFetcher`] is the real implementation;
//! tests substitute an in-memory map.

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/71.0.3578.98 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A page fetch that did not produce a body.
#[derive(Debug)]
pub struct FetchError(pub String);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch failed: {}", self.0)
    }
}

impl Error for FetchError {}

/// Supplies page bodies for URLs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher over a shared [`reqwest::Client`].
///
/// The request timeout bounds a hung fetch; there is deliberately no
/// retry here — a failed page is logged and skipped by the dispatcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError(format!("{url} returned {status}")));
        }

        response.text().await.map_err(|e| FetchError(e.to_string()))
    }
}
