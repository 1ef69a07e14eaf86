//! Target normalization
//!
//! Callers may pass either a bare domain (`example.com`) or a full URL.
//! Probes need different views of it: the full URL for page fetches and
//! blacklist lookups, the host for TLS and registration lookups, and the
//! host without a leading `www.` for review listings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Input validation errors, raised before any probe runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("URL is required")]
    Missing,

    #[error("Invalid URL: {0}")]
    Invalid(String),

    #[error("URL has no host: {0}")]
    NoHost(String),
}

/// A validated check target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Full URL (scheme added when missing)
    pub url: String,
    /// Host name, lowercased
    pub host: String,
    /// Host with a leading `www.` label removed
    pub bare_domain: String,
}

impl Target {
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetError::Missing);
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let parsed = Url::parse(&with_scheme).map_err(|e| TargetError::Invalid(format!("{}: {}", trimmed, e)))?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TargetError::NoHost(trimmed.to_string()))?
            .to_lowercase();

        Ok(Self {
            url: parsed.to_string(),
            bare_domain: bare_domain(&host),
            host,
        })
    }
}

/// Strip a leading `www.` label
pub fn bare_domain(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_domain() {
        let target = Target::parse("www.Example.com").unwrap();
        assert_eq!(target.url, "https://www.example.com/");
        assert_eq!(target.host, "www.example.com");
        assert_eq!(target.bare_domain, "example.com");
    }

    #[test]
    fn test_parse_full_url_keeps_path() {
        let target = Target::parse("http://shop.example.org/deals?x=1").unwrap();
        assert_eq!(target.url, "http://shop.example.org/deals?x=1");
        assert_eq!(target.host, "shop.example.org");
        assert_eq!(target.bare_domain, "shop.example.org");
    }

    #[test]
    fn test_missing_target_rejected() {
        assert_eq!(Target::parse("   "), Err(TargetError::Missing));
    }

    #[test]
    fn test_invalid_target_rejected() {
        assert!(matches!(Target::parse("http://"), Err(TargetError::Invalid(_))));
    }
}
