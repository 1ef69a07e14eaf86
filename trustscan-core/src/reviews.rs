//! Review-text filtering
//!
//! Review listings mix genuine review text with page chrome rendered in
//! the same kind of text block. Lines matching one of the noise patterns
//! are dropped; everything else counts as a review.

use regex::Regex;
use std::sync::LazyLock;

/// A single extracted review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub text: String,
}

// Noise patterns, each anchored at the start of the line
static REVIEW_TOTAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(,\d{3})*(\s?total)?$").unwrap()
});

static PERCENTAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+%$").unwrap()
});

static DATE_OF_EXPERIENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Date of experience:").unwrap()
});

static UI_CHROME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Filter|Most relevant)").unwrap()
});

static STAR_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}-star").unwrap()
});

/// Whether a text line is page chrome rather than a review
pub fn is_review_noise(line: &str) -> bool {
    let line = line.trim();
    line.is_empty()
        || REVIEW_TOTAL_REGEX.is_match(line)
        || PERCENTAGE_REGEX.is_match(line)
        || DATE_OF_EXPERIENCE_REGEX.is_match(line)
        || UI_CHROME_REGEX.is_match(line)
        || STAR_LABEL_REGEX.is_match(line)
}

/// Keep only genuine reviews, trimmed, in their original order
pub fn filter_reviews<I, S>(lines: I) -> Vec<Review>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| !is_review_noise(line.as_ref()))
        .map(|line| Review {
            text: line.as_ref().trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_reviews() {
        let lines = [
            "54%",
            "Date of experience: Jan 1",
            "Great service!",
            "5-star",
            "Most relevant",
            "Terrible, never again",
        ];
        let texts: Vec<_> = filter_reviews(lines).into_iter().map(|r| r.text).collect();
        assert_eq!(texts, ["Great service!", "Terrible, never again"]);
    }

    #[test]
    fn test_review_totals_are_noise() {
        assert!(is_review_noise("1,234"));
        assert!(is_review_noise("12,345 total"));
        assert!(is_review_noise("87total"));
        assert!(is_review_noise("Filter"));
        assert!(is_review_noise("   "));
    }

    #[test]
    fn test_numbers_inside_text_are_kept() {
        assert!(!is_review_noise("Delivered in 2 days, 100% happy"));
        assert!(!is_review_noise("They filtered my spam"));
        assert!(!is_review_noise("Gave them 5 stars"));
    }
}
