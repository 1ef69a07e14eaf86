//! Scan configuration
//!
//! Settings come from an optional TOML file; every field has a default.
//! Credentials are normally left out of the file and overlaid from the
//! environment at startup.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use trustscan_probes::{BlacklistConfig, ReviewConfig, SocialConfig, TlsConfig, WhoisConfig};

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Deadlines applied by the orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Budget for any single probe in seconds
    pub probe_timeout_secs: u64,
    /// Budget for the whole joined probe set in seconds
    pub overall_deadline_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 150,
            overall_deadline_secs: 180,
        }
    }
}

impl OrchestratorConfig {
    /// Effective per-probe budget: the tighter of the two deadlines
    pub fn probe_budget(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.min(self.overall_deadline_secs))
    }
}

/// Complete scan configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub orchestrator: OrchestratorConfig,
    pub tls: TlsConfig,
    pub blacklist: BlacklistConfig,
    pub whois: WhoisConfig,
    pub social: SocialConfig,
    pub reviews: ReviewConfig,
}

impl ScanConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Overlay credentials; `None` keeps whatever the file provided
    pub fn with_credentials(mut self, blacklist_key: Option<String>, whois_key: Option<String>) -> Self {
        if blacklist_key.is_some() {
            self.blacklist.api_key = blacklist_key;
        }
        if whois_key.is_some() {
            self.whois.api_key = whois_key;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.tls.poll_interval_secs, 10);
        assert_eq!(config.tls.max_polls, 12);
        assert_eq!(config.tls.deadline_secs, 120);
        assert_eq!(config.social.timeout_secs, 10);
        assert_eq!(config.social.max_links, 100);
        assert_eq!(config.orchestrator.probe_budget(), Duration::from_secs(150));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let raw = r#"
            [tls]
            max_polls = 4

            [social]
            extra_patterns = ["mastodon.social"]

            [orchestrator]
            overall_deadline_secs = 60
        "#;

        let config = ScanConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.tls.max_polls, 4);
        assert_eq!(config.tls.poll_interval_secs, 10);
        assert_eq!(config.social.extra_patterns, ["mastodon.social"]);
        assert_eq!(config.orchestrator.probe_budget(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ScanConfig::from_toml_str("[tls]\nmax_polls = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_credentials_overlay() {
        let config = ScanConfig::from_toml_str("[whois]\napi_key = \"from-file\"")
            .unwrap()
            .with_credentials(Some("gsb".to_string()), None);

        assert_eq!(config.blacklist.api_key.as_deref(), Some("gsb"));
        assert_eq!(config.whois.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_file() {
        let result = ScanConfig::load(Path::new("/nonexistent/trustscan.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
