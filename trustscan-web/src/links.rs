//! Hyperlink extraction
//!
//! Pure structural parsing: markup is parsed into a tree and anchor
//! targets are read off it. Script content is never evaluated.

use scraper::{Html, Selector};

/// Every non-empty `href` on an anchor element, in document order
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}
