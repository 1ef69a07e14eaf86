//! Probe identities and normalized probe results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::{MAX_SCORE, MIN_SCORE};

/// Explanatory detail attached to a probe result (key-ordered)
pub type Detail = Map<String, Value>;

/// The fixed set of signal probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// TLS configuration grade
    TlsGrade,
    /// Blacklist / malware status
    Blacklist,
    /// Domain registration age
    DomainAge,
    /// Social-media presence on the landing page
    SocialPresence,
    /// Customer review sentiment
    ReviewSentiment,
}

impl ProbeKind {
    /// Every probe, in report order
    pub const ALL: [ProbeKind; 5] = [
        ProbeKind::TlsGrade,
        ProbeKind::Blacklist,
        ProbeKind::DomainAge,
        ProbeKind::SocialPresence,
        ProbeKind::ReviewSentiment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::TlsGrade => "tls_grade",
            ProbeKind::Blacklist => "blacklist",
            ProbeKind::DomainAge => "domain_age",
            ProbeKind::SocialPresence => "social_presence",
            ProbeKind::ReviewSentiment => "review_sentiment",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a probe established its signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    #[default]
    Ok,
    Error,
}

/// Normalized outcome of one probe
///
/// `score` is always present and always within `[0, 1]`, including on
/// the error path where it is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub score: f64,
    pub detail: Detail,
    pub status: ProbeStatus,
}

impl ProbeResult {
    /// A successful result; `detail` should be a JSON object
    pub fn ok(score: f64, detail: Value) -> Self {
        Self {
            score: clamp_score(score),
            detail: into_detail(detail),
            status: ProbeStatus::Ok,
        }
    }

    /// A failed result scoring `0.0` with `detail.error` set
    pub fn error(message: impl Into<String>) -> Self {
        let mut detail = Detail::new();
        detail.insert("error".to_string(), Value::String(message.into()));
        Self {
            score: MIN_SCORE,
            detail,
            status: ProbeStatus::Error,
        }
    }

    /// A failed result that keeps partial findings next to the error
    pub fn error_with(message: impl Into<String>, detail: Value) -> Self {
        let mut result = Self::error(message);
        for (key, value) in into_detail(detail) {
            result.detail.entry(key).or_insert(value);
        }
        result
    }

    pub fn is_ok(&self) -> bool {
        self.status == ProbeStatus::Ok
    }

    /// The `detail.error` message, if any
    pub fn error_message(&self) -> Option<&str> {
        self.detail.get("error").and_then(Value::as_str)
    }
}

/// Clamp a raw score into `[0, 1]`; NaN counts as no signal
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

fn into_detail(value: Value) -> Detail {
    match value {
        Value::Object(map) => map,
        Value::Null => Detail::new(),
        other => {
            let mut map = Detail::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
