//! TLS-Grade Probe
//!
//! The grading service analyzes a host asynchronously. The probe asks for
//! an analysis (cached results are accepted), then re-polls at a fixed
//! interval while the service reports it is still working. Polling stops
//! at `Ready`, at `Error`, or when the poll count or wall-clock budget is
//! spent, whichever comes first.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use trustscan_core::{grade_score, ProbeKind, ProbeResult, Target, WORST_GRADE};

use crate::{settle, Probe, ProbeError};

/// TLS grading configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Grading service API base
    pub api_base: String,
    /// Delay between polls in seconds
    pub poll_interval_secs: u64,
    /// Maximum number of poll requests per check
    pub max_polls: u32,
    /// Wall-clock budget for the whole polling loop in seconds
    pub deadline_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.ssllabs.com/api/v3".to_string(),
            poll_interval_secs: 10,
            max_polls: 12,
            deadline_secs: 120,
            request_timeout_secs: 30,
        }
    }
}

impl TlsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Progress reported by the grading service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "IN_PROGRESS", alias = "DNS")]
    InProgress,
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "ERROR")]
    Error,
}

/// One graded endpoint of the host
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsEndpoint {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

/// One poll response from the grading service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsAnalysis {
    pub status: AnalysisStatus,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<TlsEndpoint>,
}

/// Asynchronous TLS grading service
#[async_trait]
pub trait TlsGradingService: Send + Sync {
    /// Request (or re-poll) the analysis of `host`
    async fn analyze(&self, host: &str) -> Result<TlsAnalysis, ProbeError>;
}

/// SSL Labs API v3 client
pub struct SslLabsClient {
    client: Client,
    api_base: String,
}

impl SslLabsClient {
    pub fn new(config: &TlsConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TlsGradingService for SslLabsClient {
    async fn analyze(&self, host: &str) -> Result<TlsAnalysis, ProbeError> {
        let url = format!("{}/analyze", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("host", host), ("fromCache", "on"), ("startNew", "off")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProbeError::Upstream(format!(
                "TLS grading service returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Probe scoring the TLS configuration grade of the target host
pub struct TlsGradeProbe {
    config: TlsConfig,
    service: Arc<dyn TlsGradingService>,
}

impl TlsGradeProbe {
    pub fn new(config: TlsConfig, service: Arc<dyn TlsGradingService>) -> Self {
        Self { config, service }
    }

    pub fn with_ssl_labs(config: TlsConfig) -> Result<Self, ProbeError> {
        let service = Arc::new(SslLabsClient::new(&config)?);
        Ok(Self::new(config, service))
    }

    /// Poll until the analysis is ready, failed, or the poll budget is spent
    async fn poll_until_ready(&self, host: &str) -> Result<TlsAnalysis, ProbeError> {
        let max_polls = self.config.max_polls.max(1);

        for attempt in 1..=max_polls {
            let analysis = self.service.analyze(host).await?;

            match analysis.status {
                AnalysisStatus::Ready => {
                    debug!("TLS analysis of {} ready after {} polls", host, attempt);
                    return Ok(analysis);
                }
                AnalysisStatus::Error => {
                    let message = analysis
                        .status_message
                        .unwrap_or_else(|| "Error in TLS grading analysis".to_string());
                    return Err(ProbeError::Upstream(message));
                }
                AnalysisStatus::InProgress => {
                    if attempt < max_polls {
                        debug!(
                            "TLS analysis of {} in progress (poll {}/{}), waiting {:?}",
                            host,
                            attempt,
                            max_polls,
                            self.config.poll_interval()
                        );
                        tokio::time::sleep(self.config.poll_interval()).await;
                    }
                }
            }
        }

        Err(ProbeError::Timeout(format!(
            "TLS analysis of {} still in progress after {} polls",
            host, max_polls
        )))
    }

    async fn run(&self, target: &Target) -> Result<ProbeResult, ProbeError> {
        let deadline = self.config.deadline();
        let analysis = tokio::time::timeout(deadline, self.poll_until_ready(&target.host))
            .await
            .map_err(|_| {
                ProbeError::Timeout(format!(
                    "TLS analysis of {} exceeded {}s deadline",
                    target.host,
                    deadline.as_secs()
                ))
            })??;

        let endpoint = analysis
            .endpoints
            .first()
            .ok_or_else(|| ProbeError::NotFound(format!("no graded endpoints for {}", target.host)))?;

        let grade_defaulted = endpoint.grade.is_none();
        let grade = endpoint.grade.clone().unwrap_or_else(|| WORST_GRADE.to_string());
        let score = grade_score(&grade);

        info!("TLS grade for {}: {} (score {})", target.host, grade, score);

        Ok(ProbeResult::ok(
            score,
            json!({
                "grade": grade,
                "grade_defaulted": grade_defaulted,
                "status_message": "Analysis complete",
            }),
        ))
    }
}

#[async_trait]
impl Probe for TlsGradeProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::TlsGrade
    }

    async fn probe(&self, target: &Target) -> ProbeResult {
        settle(self.kind(), self.run(target).await)
    }
}
