//! Blacklist Probe
//!
//! Looks the target URL up in a threat-intelligence service. Only an
//! explicit "no matches" answer earns the safe score; any failure to get
//! that answer scores as unsafe.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use trustscan_core::{ProbeKind, ProbeResult, Target, MAX_SCORE, MIN_SCORE};

use crate::{settle, Probe, ProbeError};

/// Threat categories checked for every URL
pub const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

/// Threat lookup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Lookup endpoint
    pub api_url: String,
    /// API key (usually supplied through the environment)
    pub api_key: Option<String>,
    /// Client identity reported to the service
    pub client_id: String,
    pub client_version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            api_url: "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string(),
            api_key: None,
            client_id: "trustscan".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout_secs: 15,
        }
    }
}

/// A single threat match reported for the URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    #[serde(default)]
    pub threat_type: Option<String>,
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub threat_entry_type: Option<String>,
    #[serde(default)]
    pub threat: Option<ThreatEntry>,
    #[serde(default)]
    pub cache_duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatEntry {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of a threat lookup; an empty body means no matches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreatMatchesResponse {
    #[serde(default)]
    pub matches: Vec<ThreatMatch>,
}

/// Threat-intelligence lookup service
#[async_trait]
pub trait ThreatLookup: Send + Sync {
    /// Threat matches for `url`; empty when the URL is clean
    async fn find_matches(&self, url: &str) -> Result<Vec<ThreatMatch>, ProbeError>;
}

/// Google Safe Browsing v4 client
pub struct SafeBrowsingClient {
    client: Client,
    config: BlacklistConfig,
}

impl SafeBrowsingClient {
    pub fn new(config: BlacklistConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn request_body(&self, url: &str) -> serde_json::Value {
        json!({
            "client": {
                "clientId": self.config.client_id,
                "clientVersion": self.config.client_version,
            },
            "threatInfo": {
                "threatTypes": THREAT_TYPES,
                "platformTypes": ["ANY_PLATFORM"],
                "threatEntryTypes": ["URL"],
                "threatEntries": [{ "url": url }],
            }
        })
    }
}

#[async_trait]
impl ThreatLookup for SafeBrowsingClient {
    async fn find_matches(&self, url: &str) -> Result<Vec<ThreatMatch>, ProbeError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ProbeError::Upstream("threat lookup API key is not configured".to_string())
        })?;

        let response = self
            .client
            .post(&self.config.api_url)
            .query(&[("key", api_key)])
            .json(&self.request_body(url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Upstream(format!("API error: {}, {}", status, body.trim())));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: ThreatMatchesResponse = serde_json::from_str(&body)?;
        Ok(parsed.matches)
    }
}

/// Probe scoring the blacklist status of the target URL
pub struct BlacklistProbe {
    lookup: Arc<dyn ThreatLookup>,
}

impl BlacklistProbe {
    pub fn new(lookup: Arc<dyn ThreatLookup>) -> Self {
        Self { lookup }
    }

    pub fn with_safe_browsing(config: BlacklistConfig) -> Result<Self, ProbeError> {
        Ok(Self::new(Arc::new(SafeBrowsingClient::new(config)?)))
    }

    async fn run(&self, target: &Target) -> Result<ProbeResult, ProbeError> {
        let matches = self.lookup.find_matches(&target.url).await?;

        if matches.is_empty() {
            info!("{} is not blacklisted", target.url);
            return Ok(ProbeResult::ok(
                MAX_SCORE,
                json!({
                    "url": target.url,
                    "blacklisted": false,
                    "message": "The URL is safe and not blacklisted.",
                }),
            ));
        }

        warn!("{} matched {} threat entries", target.url, matches.len());
        Ok(ProbeResult::ok(
            MIN_SCORE,
            json!({
                "url": target.url,
                "blacklisted": true,
                "threats": matches,
            }),
        ))
    }
}

#[async_trait]
impl Probe for BlacklistProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Blacklist
    }

    async fn probe(&self, target: &Target) -> ProbeResult {
        settle(self.kind(), self.run(target).await)
    }
}
