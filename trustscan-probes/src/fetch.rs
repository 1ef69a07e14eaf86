//! Page fetching seam for the markup-based probes

use async_trait::async_trait;
use reqwest::Client;

use trustscan_web::{create_client, fetch_page, HttpConfig};

use crate::ProbeError;

/// Fetches a page body as text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ProbeError>;
}

/// Fetches pages over plain HTTP with a browser user agent
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProbeError> {
        Self::new(&HttpConfig::with_timeout(timeout_secs))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
        Ok(fetch_page(&self.client, url).await?)
    }
}
