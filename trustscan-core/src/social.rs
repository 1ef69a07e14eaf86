//! Social-platform link patterns

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Platforms recognized by default
pub const DEFAULT_SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "snapchat.com",
    "reddit.com",
];

/// Cap on collected social links per page
pub const DEFAULT_MAX_SOCIAL_LINKS: usize = 100;

static DEFAULT_PATTERNS: LazyLock<SocialPatterns> = LazyLock::new(|| {
    SocialPatterns::new(DEFAULT_SOCIAL_DOMAINS.iter().copied())
        .expect("default social patterns are valid")
});

/// Case-insensitive matcher over a set of social-platform domains
#[derive(Debug, Clone)]
pub struct SocialPatterns {
    regex: Option<Regex>,
    domains: Vec<String>,
}

impl SocialPatterns {
    /// Build a matcher for the given domains (matched literally)
    pub fn new<I, S>(domains: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: Vec<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let regex = if domains.is_empty() {
            None
        } else {
            let alternation = domains.iter().map(|d| regex::escape(d)).collect::<Vec<_>>().join("|");
            Some(
                RegexBuilder::new(&format!("({})", alternation))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self { regex, domains })
    }

    /// Default platforms plus any extra domains
    pub fn with_extra<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra: Vec<String> = extra.into_iter().map(|d| d.as_ref().to_string()).collect();
        if extra.is_empty() {
            return Ok(Self::default());
        }
        Self::new(DEFAULT_SOCIAL_DOMAINS.iter().map(|d| d.to_string()).chain(extra))
    }

    pub fn is_social(&self, href: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(href))
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Links that point at a social platform, capped at `max_links`
    pub fn matching_links<I, S>(&self, hrefs: I, max_links: usize) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        hrefs
            .into_iter()
            .filter(|href| self.is_social(href.as_ref()))
            .take(max_links)
            .map(|href| href.as_ref().to_string())
            .collect()
    }
}

impl Default for SocialPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_are_case_insensitive() {
        let patterns = SocialPatterns::default();
        assert!(patterns.is_social("https://www.FaceBook.com/acme"));
        assert!(patterns.is_social("https://youtube.com/@acme"));
        assert!(!patterns.is_social("https://example.com"));
    }

    #[test]
    fn test_dots_are_literal() {
        let patterns = SocialPatterns::default();
        assert!(!patterns.is_social("https://redditXcom.example"));
    }

    #[test]
    fn test_matching_links_capped() {
        let patterns = SocialPatterns::default();
        let hrefs: Vec<String> = (0..150).map(|i| format!("https://twitter.com/u{}", i)).collect();
        assert_eq!(patterns.matching_links(&hrefs, DEFAULT_MAX_SOCIAL_LINKS).len(), 100);
    }

    #[test]
    fn test_extra_domains_extend_defaults() {
        let patterns = SocialPatterns::with_extra(["mastodon.social"]).unwrap();
        assert!(patterns.is_social("https://mastodon.social/@acme"));
        assert!(patterns.is_social("https://linkedin.com/company/acme"));
        assert_eq!(patterns.domains().len(), DEFAULT_SOCIAL_DOMAINS.len() + 1);
    }

    #[test]
    fn test_empty_pattern_set_matches_nothing() {
        let patterns = SocialPatterns::new(Vec::<String>::new()).unwrap();
        assert!(!patterns.is_social("https://facebook.com"));
    }
}
