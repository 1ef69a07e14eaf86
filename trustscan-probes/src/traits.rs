//! Common traits for signal probes

use async_trait::async_trait;
use thiserror::Error;
use trustscan_core::{ProbeKind, ProbeResult, Target};
use trustscan_web::WebError;

/// Failure modes inside a probe
///
/// These never leave a probe; [`ProbeError::into_result`] turns them into
/// a `0.0` error result.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Network failure or client-side timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// The external service reported its own failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Unexpected or malformed response
    #[error("Parse error: {0}")]
    Parse(String),

    /// An expected field or item is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A polling or deadline budget ran out
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl ProbeError {
    pub fn into_result(self) -> ProbeResult {
        ProbeResult::error(self.to_string())
    }

    /// Error result that keeps partial findings in its detail
    pub fn into_result_with(self, detail: serde_json::Value) -> ProbeResult {
        ProbeResult::error_with(self.to_string(), detail)
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProbeError::Parse(e.to_string())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}

impl From<WebError> for ProbeError {
    fn from(e: WebError) -> Self {
        match e {
            WebError::Request(e) => e.into(),
            WebError::Status { .. } => ProbeError::Upstream(e.to_string()),
            WebError::ClientBuild(_) => ProbeError::Transport(e.to_string()),
            WebError::Selector(_) => ProbeError::Parse(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(e: serde_json::Error) -> Self {
        ProbeError::Parse(e.to_string())
    }
}

/// Common interface for all signal probes
#[async_trait]
pub trait Probe: Send + Sync {
    /// Which signal this probe establishes
    fn kind(&self) -> ProbeKind;

    /// Check one target; always yields a result
    async fn probe(&self, target: &Target) -> ProbeResult;
}

/// Collapse a fallible probe body into a result
pub(crate) fn settle(kind: ProbeKind, outcome: Result<ProbeResult, ProbeError>) -> ProbeResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Probe {} failed: {}", kind, e);
            e.into_result()
        }
    }
}
