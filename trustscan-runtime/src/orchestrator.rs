//! Probe orchestrator
//!
//! Fans every probe out as its own task, joins on all of them and only
//! then aggregates:
//! - Probes run concurrently; wall-clock cost is the slowest probe
//! - Each task is bounded by the tighter of the per-probe and overall budgets
//! - A probe that panics or runs out of time becomes a `0.0` error result
//! - The caller always receives one result per probe kind; a kind
//!   with no registered probe counts as a `0.0` error result

use futures::future::join_all;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use trustscan_core::{AggregateReport, ProbeKind, ProbeResult, Target, TargetError};
use trustscan_probes::{
    BlacklistProbe, DomainAgeProbe, Probe, ReviewSentimentProbe, SocialPresenceProbe, TlsGradeProbe,
};

use crate::{OrchestratorConfig, ScanConfig};

/// Runs the configured probes for one target at a time
pub struct Orchestrator {
    config: OrchestratorConfig,
    probes: Vec<Arc<dyn Probe>>,
}

impl Orchestrator {
    /// An orchestrator with no probes registered
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            probes: Vec::new(),
        }
    }

    /// All five production probes, built from configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self, anyhow::Error> {
        let orchestrator = Self::new(config.orchestrator.clone())
            .with_probe(Arc::new(BlacklistProbe::with_safe_browsing(config.blacklist.clone())?))
            .with_probe(Arc::new(TlsGradeProbe::with_ssl_labs(config.tls.clone())?))
            .with_probe(Arc::new(DomainAgeProbe::with_whois_xml(config.whois.clone())?))
            .with_probe(Arc::new(SocialPresenceProbe::from_config(&config.social)?))
            .with_probe(Arc::new(ReviewSentimentProbe::from_config(config.reviews.clone())?));

        info!("Initialized {} probes", orchestrator.probes.len());
        Ok(orchestrator)
    }

    /// Register a probe; it replaces any probe of the same kind
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        let kind = probe.kind();
        self.probes.retain(|p| p.kind() != kind);
        self.probes.push(probe);
        self
    }

    /// Kinds of the registered probes
    pub fn kinds(&self) -> Vec<ProbeKind> {
        let mut kinds: Vec<_> = self.probes.iter().map(|p| p.kind()).collect();
        kinds.sort();
        kinds
    }

    /// Validate the input, then run every probe against it
    ///
    /// Only input validation can fail; probe failures are folded into the
    /// report as `0.0` error results.
    pub async fn check(&self, domain_or_url: &str) -> Result<AggregateReport, TargetError> {
        let target = Target::parse(domain_or_url)?;
        Ok(self.check_target(&target).await)
    }

    /// Run every probe against an already validated target
    pub async fn check_target(&self, target: &Target) -> AggregateReport {
        let budget = self.config.probe_budget();
        let start = Instant::now();

        info!("Checking {} with {} probes", target.url, self.probes.len());

        let (kinds, handles): (Vec<_>, Vec<_>) = self
            .probes
            .iter()
            .map(|probe| {
                let kind = probe.kind();
                let probe = Arc::clone(probe);
                let target = target.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(budget, probe.probe(&target)).await
                });
                (kind, handle)
            })
            .unzip();

        let outcomes = join_all(handles).await;

        let mut per_probe = BTreeMap::new();
        for (kind, outcome) in kinds.into_iter().zip(outcomes) {
            let result = match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => {
                    warn!("Probe {} exceeded its {}s budget", kind, budget.as_secs());
                    ProbeResult::error(format!("{} timed out after {}s", kind, budget.as_secs()))
                }
                Err(e) => {
                    error!("Probe {} crashed: {}", kind, e);
                    ProbeResult::error(describe_join_error(kind, e))
                }
            };
            debug!("Probe {} scored {} ({:?})", kind, result.score, result.status);
            per_probe.insert(kind, result);
        }

        // Every probe kind is a term of the mean, registered or not
        for kind in ProbeKind::ALL {
            per_probe.entry(kind).or_insert_with(|| {
                warn!("Probe {} is not configured", kind);
                ProbeResult::error(format!("{} not configured", kind))
            });
        }

        let report = AggregateReport::new(&target.url, per_probe);
        info!(
            "Check of {} finished in {:.1}s: final score {:.2} ({} failed)",
            target.url,
            start.elapsed().as_secs_f64(),
            report.final_score,
            report.failed_count()
        );
        report
    }
}

fn describe_join_error(kind: ProbeKind, e: JoinError) -> String {
    if e.is_panic() {
        format!("{} panicked: {}", kind, panic_message(e.into_panic()))
    } else {
        format!("{} was cancelled", kind)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
