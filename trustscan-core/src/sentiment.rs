//! Lexicon polarity and review sentiment distribution
//!
//! Polarity is the mean of the scores of lexicon words found in the text,
//! in `[-1, 1]`. An intensifier directly before a lexicon word scales it;
//! a negation directly before flips it at half strength ("not good" is
//! mildly negative, not the opposite of "good").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{Review, MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};

/// Polarity above which a review is positive
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Polarity below which a review is negative
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Share (percent) a class needs to decide the score
pub const MAJORITY_PCT: f64 = 50.0;

const NEGATION_FACTOR: f64 = -0.5;

static LEXICON: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        // favorable
        ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("amazing", 0.6),
        ("awesome", 1.0), ("fantastic", 0.4), ("wonderful", 1.0), ("perfect", 1.0),
        ("best", 1.0), ("better", 0.5), ("nice", 0.6), ("love", 0.5),
        ("loved", 0.7), ("happy", 0.8), ("pleased", 0.5), ("satisfied", 0.5),
        ("recommend", 0.4), ("recommended", 0.4), ("helpful", 0.5), ("friendly", 0.4),
        ("fast", 0.2), ("quick", 0.33), ("quickly", 0.33), ("easy", 0.43),
        ("smooth", 0.4), ("reliable", 0.5), ("trustworthy", 0.6), ("professional", 0.3),
        ("polite", 0.5), ("efficient", 0.4), ("brilliant", 0.9), ("outstanding", 0.5),
        ("superb", 1.0), ("impressive", 1.0), ("positive", 0.23), ("fine", 0.42),
        ("fair", 0.7), ("cheap", 0.4), ("affordable", 0.4), ("quality", 0.3),
        ("genuine", 0.4), ("legit", 0.5), ("thanks", 0.2), ("thank", 0.2),
        ("glad", 0.5), ("delighted", 0.8), ("exceptional", 0.67), ("prompt", 0.4),
        ("safe", 0.5), ("secure", 0.4), ("correct", 0.3),
        // unfavorable
        ("bad", -0.7), ("terrible", -1.0), ("awful", -1.0), ("horrible", -1.0),
        ("worst", -1.0), ("worse", -0.4), ("poor", -0.4), ("rude", -0.3),
        ("slow", -0.3), ("scam", -0.8), ("scammed", -0.8), ("fraud", -0.8),
        ("fake", -0.5), ("broken", -0.4), ("damaged", -0.5), ("wrong", -0.5),
        ("disappointed", -0.75), ("disappointing", -0.6), ("useless", -0.5), ("waste", -0.2),
        ("hate", -0.8), ("hated", -0.9), ("angry", -0.5), ("annoying", -0.8),
        ("unhelpful", -0.5), ("unreliable", -0.5), ("unprofessional", -0.5), ("dishonest", -0.6),
        ("late", -0.3), ("missing", -0.2), ("lost", -0.2),
        ("avoid", -0.5), ("stolen", -0.6), ("expensive", -0.5), ("overpriced", -0.5),
        ("nightmare", -0.7), ("disgusting", -1.0), ("pathetic", -1.0), ("ridiculous", -0.33),
        ("incompetent", -0.5), ("unacceptable", -0.6), ("dreadful", -1.0), ("problem", -0.3),
        ("problems", -0.3), ("difficult", -0.5), ("sad", -0.5), ("shame", -0.4),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        ("very", 1.3), ("really", 1.3), ("so", 1.3), ("super", 1.3),
        ("extremely", 1.5), ("incredibly", 1.5), ("absolutely", 1.5), ("totally", 1.3),
        ("highly", 1.3), ("truly", 1.3), ("quite", 1.1), ("too", 1.2),
        ("pretty", 1.1), ("most", 1.2),
    ]
    .into_iter()
    .collect()
});

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "hardly", "cannot", "dont", "don't", "didn't", "didnt",
    "isn't", "isnt", "wasn't", "wasnt", "won't", "wont", "can't", "cant", "couldn't",
    "wouldn't", "doesn't", "doesnt", "aren't", "weren't", "without",
];

/// Polarity class of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Bucket a polarity with strict thresholds: exactly ±0.1 is neutral
    pub fn classify(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Continuous polarity of a text in `[-1, 1]`; `0.0` if no lexicon word occurs
pub fn polarity(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let tokens = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty());

    let mut scores = Vec::new();
    let mut intensity: Option<f64> = None;
    let mut negated = false;

    for token in tokens {
        if NEGATIONS.contains(&token) {
            negated = true;
            continue;
        }
        if let Some(factor) = INTENSIFIERS.get(token) {
            intensity = Some(intensity.unwrap_or(1.0) * factor);
            continue;
        }

        if let Some(&score) = LEXICON.get(token) {
            let mut score = score * intensity.unwrap_or(1.0);
            if negated {
                score *= NEGATION_FACTOR;
            }
            scores.push(score.clamp(-1.0, 1.0));
        }

        // Modifiers only reach the word right after them
        intensity = None;
        negated = false;
    }

    if scores.is_empty() {
        0.0
    } else {
        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }
}

/// Share of positive, negative and neutral reviews, in percent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(rename = "positive")]
    pub positive_pct: f64,
    #[serde(rename = "negative")]
    pub negative_pct: f64,
    #[serde(rename = "neutral")]
    pub neutral_pct: f64,
}

impl SentimentDistribution {
    /// Classify every review; all-zero when there are none
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let classes: Vec<_> = reviews
            .iter()
            .map(|r| Sentiment::classify(polarity(&r.text)))
            .collect();
        Self::from_classes(&classes)
    }

    pub fn from_classes(classes: &[Sentiment]) -> Self {
        if classes.is_empty() {
            return Self::default();
        }

        let total = classes.len() as f64;
        let pct = |wanted: Sentiment| {
            classes.iter().filter(|&&c| c == wanted).count() as f64 / total * 100.0
        };

        Self {
            positive_pct: pct(Sentiment::Positive),
            negative_pct: pct(Sentiment::Negative),
            neutral_pct: pct(Sentiment::Neutral),
        }
    }

    /// Positive majority → 1.0, negative majority → 0.0, otherwise 0.5
    pub fn score(&self) -> f64 {
        if self.positive_pct > MAJORITY_PCT {
            MAX_SCORE
        } else if self.negative_pct > MAJORITY_PCT {
            MIN_SCORE
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Human-readable summary of a review distribution
pub fn sentiment_report(domain: &str, distribution: &SentimentDistribution, review_count: usize) -> String {
    let mut report = format!("Safety Report for {}\n", domain);
    report.push_str(&"=".repeat(40));
    report.push('\n');
    report.push_str(&format!("Total Reviews Scraped: {}\n", review_count));
    report.push_str(&format!("Positive Reviews: {:.2}%\n", distribution.positive_pct));
    report.push_str(&format!("Negative Reviews: {:.2}%\n", distribution.negative_pct));
    report.push_str(&format!("Neutral Reviews: {:.2}%\n\n", distribution.neutral_pct));

    if distribution.negative_pct > MAJORITY_PCT {
        report.push_str("⚠️ High percentage of negative reviews! Proceed with caution.\n");
    } else {
        report.push_str("✅ Website appears to have a good reputation based on reviews.\n");
    }

    report
}
