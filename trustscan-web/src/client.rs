//! HTTP client construction and page fetching

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Timeout for the reachability check
pub const EXISTS_TIMEOUT_SECS: u64 = 5;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Fixed user agent; a browser agent is picked at random when unset
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Default::default()
        }
    }
}

/// Errors from HTTP fetching
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Browser user agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random browser user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Create an HTTP client that identifies as a browser
pub fn create_client(config: &HttpConfig) -> Result<Client, WebError> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| random_user_agent().to_string());

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(|e| WebError::ClientBuild(e.to_string()))
}

/// GET a page body, failing on any non-success status
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, WebError> {
    debug!("Fetching: {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        warn!("Fetch of {} returned status: {}", url, status);
        return Err(WebError::Status {
            url: url.to_string(),
            status,
        });
    }

    Ok(response.text().await?)
}

/// Check whether a URL answers a plain GET with `200 OK`
///
/// Transport failures and timeouts count as "does not exist".
pub async fn check_url_exists(url: &str) -> Result<bool, WebError> {
    let client = create_client(&HttpConfig::with_timeout(EXISTS_TIMEOUT_SECS))?;

    match client.get(url).send().await {
        Ok(resp) => Ok(resp.status() == StatusCode::OK),
        Err(e) => {
            debug!("Reachability check for {} failed: {}", url, e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_random_user_agent() {
        let ua = random_user_agent();
        assert!(ua.contains("Mozilla"));
    }

    #[test]
    fn test_create_client() {
        let config = HttpConfig {
            timeout_secs: 3,
            user_agent: Some("trustscan-test".to_string()),
        };
        assert!(create_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_url_does_not_exist() {
        let exists = check_url_exists("http://127.0.0.1:9/").await.unwrap();
        assert!(!exists);
    }
}
