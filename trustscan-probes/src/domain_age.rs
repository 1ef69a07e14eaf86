//! Domain-Age Probe
//!
//! Older registrations are more trustworthy. An unknown age is treated
//! as untrustworthy, never as neutral.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use trustscan_core::{age_score, age_years, parse_creation_date, ProbeKind, ProbeResult, Target};

use crate::{settle, Probe, ProbeError};

/// Registration lookup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhoisConfig {
    /// WHOIS service endpoint
    pub api_url: String,
    /// API key (usually supplied through the environment)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.whoisxmlapi.com/whoisserver/WhoisService".to_string(),
            api_key: None,
            timeout_secs: 20,
        }
    }
}

/// The registration facts the probe relies on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// Raw creation timestamp as reported by the registry
    pub created_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhoisResponse {
    #[serde(rename = "WhoisRecord")]
    whois_record: Option<WhoisRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WhoisRecord {
    #[serde(default)]
    registry_data: Option<RegistryData>,
    #[serde(default)]
    created_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryData {
    #[serde(default)]
    created_date: Option<String>,
}

/// Parse a WHOIS JSON document into a registration record
///
/// The registry section is authoritative; the registrar-level date is the
/// fallback.
pub fn parse_whois_record(body: &str) -> Result<RegistrationRecord, ProbeError> {
    let response: WhoisResponse = serde_json::from_str(body)?;
    let record = response
        .whois_record
        .ok_or_else(|| ProbeError::Parse("response has no WhoisRecord".to_string()))?;

    let created_date = record
        .registry_data
        .and_then(|r| r.created_date)
        .or(record.created_date)
        .filter(|d| !d.trim().is_empty());

    Ok(RegistrationRecord { created_date })
}

/// Domain-registration lookup service
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<RegistrationRecord, ProbeError>;
}

/// WhoisXML API client
pub struct WhoisXmlClient {
    client: Client,
    config: WhoisConfig,
}

impl WhoisXmlClient {
    pub fn new(config: WhoisConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl RegistrationLookup for WhoisXmlClient {
    async fn lookup(&self, domain: &str) -> Result<RegistrationRecord, ProbeError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ProbeError::Upstream("registration lookup API key is not configured".to_string())
        })?;

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("apiKey", api_key), ("domainName", domain), ("outputFormat", "JSON")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProbeError::Upstream(format!(
                "registration lookup returned status {}",
                response.status()
            )));
        }

        parse_whois_record(&response.text().await?)
    }
}

/// Probe scoring how long the target domain has been registered
pub struct DomainAgeProbe {
    lookup: Arc<dyn RegistrationLookup>,
}

impl DomainAgeProbe {
    pub fn new(lookup: Arc<dyn RegistrationLookup>) -> Self {
        Self { lookup }
    }

    pub fn with_whois_xml(config: WhoisConfig) -> Result<Self, ProbeError> {
        Ok(Self::new(Arc::new(WhoisXmlClient::new(config)?)))
    }

    async fn run(&self, target: &Target) -> Result<ProbeResult, ProbeError> {
        let domain = &target.bare_domain;
        let record = self.lookup.lookup(domain).await?;

        let Some(raw) = record.created_date else {
            return Ok(ProbeError::NotFound(format!("no creation date for {}", domain))
                .into_result_with(json!({ "domain": domain, "created_date": "N/A" })));
        };

        let Some(created) = parse_creation_date(&raw) else {
            return Ok(ProbeError::Parse(format!("unrecognized creation date {:?}", raw))
                .into_result_with(json!({ "domain": domain, "created_date": raw })));
        };

        let years = age_years(created, Utc::now());
        let score = age_score(years);
        info!("{} registered {:.2} years ago (score {})", domain, years, score);

        Ok(ProbeResult::ok(
            score,
            json!({
                "domain": domain,
                "created_date": raw,
                "age_years": (years * 100.0).round() / 100.0,
            }),
        ))
    }
}

#[async_trait]
impl Probe for DomainAgeProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::DomainAge
    }

    async fn probe(&self, target: &Target) -> ProbeResult {
        settle(self.kind(), self.run(target).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as Days, SecondsFormat};
    use trustscan_core::ProbeStatus;

    struct CannedRecord(Option<String>);

    #[async_trait]
    impl RegistrationLookup for CannedRecord {
        async fn lookup(&self, _domain: &str) -> Result<RegistrationRecord, ProbeError> {
            Ok(RegistrationRecord {
                created_date: self.0.clone(),
            })
        }
    }

    struct BrokenLookup;

    #[async_trait]
    impl RegistrationLookup for BrokenLookup {
        async fn lookup(&self, _domain: &str) -> Result<RegistrationRecord, ProbeError> {
            parse_whois_record("<html>rate limited</html>")
        }
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Days::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    async fn score_for(created: Option<String>) -> ProbeResult {
        let probe = DomainAgeProbe::new(Arc::new(CannedRecord(created)));
        probe.probe(&Target::parse("example.com").unwrap()).await
    }

    #[tokio::test]
    async fn test_age_buckets() {
        assert_eq!(score_for(Some(days_ago(365 * 10))).await.score, 1.0);
        assert_eq!(score_for(Some(days_ago(365 * 2))).await.score, 0.5);
        assert_eq!(score_for(Some(days_ago(30))).await.score, 0.0);
    }

    #[tokio::test]
    async fn test_bucket_edges_are_inclusive() {
        assert_eq!(score_for(Some(days_ago(365))).await.score, 0.5);
        assert_eq!(score_for(Some(days_ago(365 * 3))).await.score, 0.5);
        assert_eq!(score_for(Some(days_ago(365 * 3 + 1))).await.score, 1.0);
    }

    #[tokio::test]
    async fn test_missing_date_is_untrusted() {
        let result = score_for(None).await;
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Error);
        assert_eq!(result.detail["created_date"], json!("N/A"));
    }

    #[tokio::test]
    async fn test_unparsable_date_is_untrusted() {
        let result = score_for(Some("sometime in 1998".to_string())).await;
        assert_eq!(result.score, 0.0);
        assert!(result.error_message().unwrap().starts_with("Parse error"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_caught() {
        let probe = DomainAgeProbe::new(Arc::new(BrokenLookup));
        let result = probe.probe(&Target::parse("example.com").unwrap()).await;
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Error);
    }

    #[test]
    fn test_parse_whois_record_prefers_registry_date() {
        let body = r#"{"WhoisRecord": {
            "createdDate": "2001-01-01T00:00:00Z",
            "registryData": { "createdDate": "1997-09-15T04:00:00Z" }
        }}"#;
        let record = parse_whois_record(body).unwrap();
        assert_eq!(record.created_date.as_deref(), Some("1997-09-15T04:00:00Z"));
    }

    #[test]
    fn test_parse_whois_record_falls_back() {
        let body = r#"{"WhoisRecord": { "createdDate": "2001-01-01T00:00:00Z", "registryData": {} }}"#;
        let record = parse_whois_record(body).unwrap();
        assert_eq!(record.created_date.as_deref(), Some("2001-01-01T00:00:00Z"));

        let empty = parse_whois_record(r#"{"WhoisRecord": {}}"#).unwrap();
        assert_eq!(empty.created_date, None);
    }

    #[test]
    fn test_parse_whois_record_requires_record() {
        assert!(matches!(parse_whois_record("{}"), Err(ProbeError::Parse(_))));
    }
}
