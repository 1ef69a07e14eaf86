//! Aggregate report combining every probe result for one target

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{clamp_score, ProbeKind, ProbeResult, MIN_SCORE};

/// Outcome of one domain check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Unique check identifier
    pub check_id: Uuid,
    /// Normalized target URL
    pub target: String,
    /// When the check completed
    pub checked_at: DateTime<Utc>,
    /// Unweighted mean of every probe score
    pub final_score: f64,
    /// One result per configured probe
    #[serde(rename = "details")]
    pub per_probe: BTreeMap<ProbeKind, ProbeResult>,
}

impl AggregateReport {
    /// Build a report from a complete set of probe results
    pub fn new(target: &str, per_probe: BTreeMap<ProbeKind, ProbeResult>) -> Self {
        Self {
            check_id: Uuid::new_v4(),
            target: target.to_string(),
            checked_at: Utc::now(),
            final_score: aggregate_score(per_probe.values()),
            per_probe,
        }
    }

    pub fn result(&self, kind: ProbeKind) -> Option<&ProbeResult> {
        self.per_probe.get(&kind)
    }

    /// Number of probes that returned an error result
    pub fn failed_count(&self) -> usize {
        self.per_probe.values().filter(|r| !r.is_ok()).count()
    }
}

/// Arithmetic mean of probe scores; error results count as their `0.0`
pub fn aggregate_score<'a>(results: impl IntoIterator<Item = &'a ProbeResult>) -> f64 {
    let (sum, count) = results
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.score, count + 1));

    if count == 0 {
        return MIN_SCORE;
    }
    clamp_score(sum / count as f64)
}
