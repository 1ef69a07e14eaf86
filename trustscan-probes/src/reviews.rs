//! Review-Sentiment Probe
//!
//! Scrapes the review listing for the target's bare domain, drops page
//! chrome, buckets each review by polarity and scores the distribution.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use trustscan_core::{filter_reviews, ProbeKind, ProbeResult, Review, SentimentDistribution, Target};
use trustscan_web::{extract_review_texts, DEFAULT_REVIEW_CONTAINER_SELECTOR, DEFAULT_REVIEW_TEXT_SELECTOR};

use crate::{settle, HttpFetcher, PageFetcher, Probe, ProbeError};

/// Review listing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Listing URL prefix; the bare domain is appended
    pub base_url: String,
    /// Selector for review containers
    pub container_selector: String,
    /// Selector for text blocks inside a container
    pub text_selector: String,
    /// Page fetch timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.trustpilot.com/review/".to_string(),
            container_selector: DEFAULT_REVIEW_CONTAINER_SELECTOR.to_string(),
            text_selector: DEFAULT_REVIEW_TEXT_SELECTOR.to_string(),
            timeout_secs: 15,
        }
    }
}

impl ReviewConfig {
    pub fn listing_url(&self, domain: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(domain))
    }
}

/// Reviews gathered for one domain, before scoring
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub domain: String,
    pub reviews: Vec<Review>,
    pub distribution: SentimentDistribution,
}

/// Probe scoring customer review sentiment for the target domain
pub struct ReviewSentimentProbe {
    config: ReviewConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl ReviewSentimentProbe {
    pub fn new(config: ReviewConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn from_config(config: ReviewConfig) -> Result<Self, ProbeError> {
        let fetcher = Arc::new(HttpFetcher::with_timeout(config.timeout_secs)?);
        Ok(Self::new(config, fetcher))
    }

    /// Fetch, filter and classify the reviews for `target`
    pub async fn collect(&self, target: &Target) -> Result<ReviewSummary, ProbeError> {
        let domain = target.bare_domain.clone();
        let url = self.config.listing_url(&domain);

        let html = self.fetcher.fetch(&url).await?;
        let lines = extract_review_texts(&html, &self.config.container_selector, &self.config.text_selector)?;
        let reviews = filter_reviews(&lines);
        debug!("{}: {} text blocks, {} reviews after filtering", domain, lines.len(), reviews.len());

        let distribution = SentimentDistribution::from_reviews(&reviews);
        Ok(ReviewSummary {
            domain,
            reviews,
            distribution,
        })
    }

    async fn run(&self, target: &Target) -> Result<ProbeResult, ProbeError> {
        let summary = self.collect(target).await?;

        if summary.reviews.is_empty() {
            return Ok(ProbeError::NotFound("No reviews found".to_string())
                .into_result_with(json!({ "domain": summary.domain, "review_count": 0 })));
        }

        let score = summary.distribution.score();
        info!(
            "{}: {} reviews, {:.1}% positive, {:.1}% negative (score {})",
            summary.domain,
            summary.reviews.len(),
            summary.distribution.positive_pct,
            summary.distribution.negative_pct,
            score
        );

        Ok(ProbeResult::ok(
            score,
            json!({
                "domain": summary.domain,
                "sentiment_data": summary.distribution,
                "review_count": summary.reviews.len(),
            }),
        ))
    }
}

#[async_trait]
impl Probe for ReviewSentimentProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::ReviewSentiment
    }

    async fn probe(&self, target: &Target) -> ProbeResult {
        settle(self.kind(), self.run(target).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use trustscan_core::ProbeStatus;

    /// Serves one listing page and records the URL requested
    struct ListingPage {
        html: String,
        requested: Mutex<Vec<String>>,
    }

    impl ListingPage {
        fn new(reviews: &[&str]) -> Arc<Self> {
            let blocks: String = reviews.iter().map(|r| format!("<p>{}</p>", r)).collect();
            Arc::new(Self {
                html: format!(
                    r#"<html><body><section class="styles_reviewsContainer__3_GQw">{}</section></body></html>"#,
                    blocks
                ),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for ListingPage {
        async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.html.clone())
        }
    }

    struct MissingListing;

    #[async_trait]
    impl PageFetcher for MissingListing {
        async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
            Err(ProbeError::Upstream(format!("{} returned status 404 Not Found", url)))
        }
    }

    fn probe_with(page: Arc<dyn PageFetcher>) -> ReviewSentimentProbe {
        ReviewSentimentProbe::new(ReviewConfig::default(), page)
    }

    #[tokio::test]
    async fn test_requests_listing_for_bare_domain() {
        let page = ListingPage::new(&["Great service!"]);
        let probe = probe_with(page.clone());
        probe.probe(&Target::parse("https://www.example.com/shop").unwrap()).await;

        let requested = page.requested.lock().unwrap();
        assert_eq!(requested.as_slice(), ["https://www.trustpilot.com/review/example.com"]);
    }

    #[tokio::test]
    async fn test_positive_majority() {
        let page = ListingPage::new(&[
            "54%",
            "Date of experience: Jan 1",
            "Great service!",
            "Excellent and fast",
            "5-star",
            "Most relevant",
            "Terrible, never again",
        ]);
        let result = probe_with(page).probe(&Target::parse("example.com").unwrap()).await;

        assert_eq!(result.status, ProbeStatus::Ok);
        assert_eq!(result.detail["review_count"], json!(3));
        assert_eq!(result.score, 1.0);
    }

    #[tokio::test]
    async fn test_negative_majority() {
        let page = ListingPage::new(&["Awful support", "Total scam, avoid", "Good prices"]);
        let result = probe_with(page).probe(&Target::parse("example.com").unwrap()).await;
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Ok);
    }

    #[tokio::test]
    async fn test_mixed_reviews() {
        let page = ListingPage::new(&["Great service!", "Terrible, never again"]);
        let result = probe_with(page).probe(&Target::parse("example.com").unwrap()).await;
        assert_eq!(result.score, 0.5);
        assert_eq!(result.detail["sentiment_data"]["positive"], json!(50.0));
    }

    #[tokio::test]
    async fn test_no_reviews_found() {
        let page = ListingPage::new(&["1,024 total", "Filter", "Most relevant"]);
        let result = probe_with(page).probe(&Target::parse("example.com").unwrap()).await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, ProbeStatus::Error);
        assert!(result.error_message().unwrap().contains("No reviews found"));
    }

    #[tokio::test]
    async fn test_missing_listing() {
        let result = probe_with(Arc::new(MissingListing))
            .probe(&Target::parse("example.com").unwrap())
            .await;
        assert_eq!(result.score, 0.0);
        assert!(result.error_message().unwrap().contains("404"));
    }

    #[test]
    fn test_listing_url_encodes_domain() {
        let config = ReviewConfig::default();
        assert_eq!(config.listing_url("example.com"), "https://www.trustpilot.com/review/example.com");
        assert_eq!(config.listing_url("ex ample.com"), "https://www.trustpilot.com/review/ex%20ample.com");
    }
}
