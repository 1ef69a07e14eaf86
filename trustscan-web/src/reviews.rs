//! Review-text block extraction from review listing pages

use scraper::{Html, Selector};
use tracing::debug;

use crate::WebError;

/// Container holding the review list on the listing page
pub const DEFAULT_REVIEW_CONTAINER_SELECTOR: &str = "section.styles_reviewsContainer__3_GQw";

/// Text blocks within a review container
pub const DEFAULT_REVIEW_TEXT_SELECTOR: &str = "p";

/// Trimmed text of every text block inside every review container
///
/// Lines are returned unfiltered; page chrome is removed later.
pub fn extract_review_texts(
    html: &str,
    container_selector: &str,
    text_selector: &str,
) -> Result<Vec<String>, WebError> {
    let container = Selector::parse(container_selector)
        .map_err(|e| WebError::Selector(format!("{}: {}", container_selector, e)))?;
    let text = Selector::parse(text_selector)
        .map_err(|e| WebError::Selector(format!("{}: {}", text_selector, e)))?;

    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for section in document.select(&container) {
        for block in section.select(&text) {
            let content = normalize_whitespace(&block.text().collect::<String>());
            if !content.is_empty() {
                lines.push(content);
            }
        }
    }

    debug!("Extracted {} review text blocks", lines.len());
    Ok(lines)
}

/// Normalize whitespace in text
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
