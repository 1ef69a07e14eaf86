//! Social-Presence Probe
//!
//! Scores 1.0 when the landing page links to at least one known social
//! platform.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use trustscan_core::{ProbeKind, ProbeResult, SocialPatterns, Target, DEFAULT_MAX_SOCIAL_LINKS, MAX_SCORE, MIN_SCORE};
use trustscan_web::extract_links;

use crate::{settle, HttpFetcher, PageFetcher, Probe, ProbeError};

/// Social presence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Page fetch timeout in seconds
    pub timeout_secs: u64,
    /// Cap on collected social links
    pub max_links: usize,
    /// Platform domains recognized in addition to the defaults
    pub extra_patterns: Vec<String>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_links: DEFAULT_MAX_SOCIAL_LINKS,
            extra_patterns: Vec::new(),
        }
    }
}

/// Probe scoring social-media presence on the target page
pub struct SocialPresenceProbe {
    fetcher: Arc<dyn PageFetcher>,
    patterns: SocialPatterns,
    max_links: usize,
}

impl SocialPresenceProbe {
    pub fn new(fetcher: Arc<dyn PageFetcher>, patterns: SocialPatterns, max_links: usize) -> Self {
        Self {
            fetcher,
            patterns,
            max_links,
        }
    }

    pub fn from_config(config: &SocialConfig) -> Result<Self, ProbeError> {
        let patterns = SocialPatterns::with_extra(&config.extra_patterns)
            .map_err(|e| ProbeError::Parse(format!("invalid social pattern: {}", e)))?;
        let fetcher = Arc::new(HttpFetcher::with_timeout(config.timeout_secs)?);
        Ok(Self::new(fetcher, patterns, config.max_links))
    }

    async fn run(&self, target: &Target) -> Result<ProbeResult, ProbeError> {
        let html = self
            .fetcher
            .fetch(&target.url)
            .await
            .map_err(|e| ProbeError::Transport(format!("Failed to retrieve {}: {}", target.url, e)))?;

        let links = extract_links(&html);
        debug!("{} has {} hyperlinks", target.url, links.len());

        let social_links = self.patterns.matching_links(&links, self.max_links);

        if social_links.is_empty() {
            return Ok(ProbeResult::ok(
                MIN_SCORE,
                json!({
                    "social_media_links": [],
                    "message": "No social media presence found",
                }),
            ));
        }

        info!("{} links to {} social profiles", target.url, social_links.len());
        Ok(ProbeResult::ok(
            MAX_SCORE,
            json!({
                "social_media_links": social_links,
                "message": "Social media presence detected",
            }),
        ))
    }
}

#[async_trait]
impl Probe for SocialPresenceProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::SocialPresence
    }

    async fn probe(&self, target: &Target) -> ProbeResult {
        settle(self.kind(), self.run(target).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustscan_core::ProbeStatus;

    struct CannedPage(Result<String, String>);

    #[async_trait]
    impl PageFetcher for CannedPage {
        async fn fetch(&self, _url: &str) -> Result<String, ProbeError> {
            self.0.clone().map_err(ProbeError::Transport)
        }
    }

    fn probe_for(page: Result<String, String>) -> SocialPresenceProbe {
        SocialPresenceProbe::new(Arc::new(CannedPage(page)), SocialPatterns::default(), 100)
    }

    #[tokio::test]
    async fn test_single_social_link() {
        let html = r#"<a href="https://facebook.com/x">fb</a><a href="https://example.com">home</a>"#;
        let result = probe_for(Ok(html.to_string()))
            .probe(&Target::parse("example.com").unwrap())
            .await;

        assert_eq!(result.score, 1.0);
        assert_eq!(result.detail["social_media_links"], json!(["https://facebook.com/x"]));
    }

    #[tokio::test]
    async fn test_no_social_links() {
        let html = r#"<a href="/contact">contact</a><p>facebook.com in plain text</p>"#;
        let result = probe_for(Ok(html.to_string()))
            .probe(&Target::parse("example.com").unwrap())
            .await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Ok);
        assert_eq!(result.detail["message"], json!("No social media presence found"));
    }

    #[tokio::test]
    async fn test_links_capped() {
        let html: String = (0..250)
            .map(|i| format!(r#"<a href="https://instagram.com/p/{}">p</a>"#, i))
            .collect();
        let probe = SocialPresenceProbe::new(Arc::new(CannedPage(Ok(html))), SocialPatterns::default(), 100);
        let result = probe.probe(&Target::parse("example.com").unwrap()).await;

        assert_eq!(result.detail["social_media_links"].as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let result = probe_for(Err("connection refused".to_string()))
            .probe(&Target::parse("example.com").unwrap())
            .await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Error);
        assert!(result.error_message().unwrap().contains("Failed to retrieve"));
    }
}
