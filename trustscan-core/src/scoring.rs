//! Fixed scoring tables
//!
//! Every table maps onto the coarse `{0.0, 0.5, 1.0}` scale.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};

/// Grade reported when the grading service omits one
pub const WORST_GRADE: &str = "D";

/// Days per year used for domain age (not leap-adjusted)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Map a TLS letter grade onto a score
///
/// `A+`/`A` are fully trusted, `B`/`C` are intermediate, and `D`, lower
/// grades and anything unrecognized score zero.
pub fn grade_score(grade: &str) -> f64 {
    match grade.trim() {
        "A+" | "A" => MAX_SCORE,
        "B" | "C" => NEUTRAL_SCORE,
        _ => MIN_SCORE,
    }
}

/// Domain age in years between `created` and `now`
pub fn age_years(created: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created).num_days() as f64 / DAYS_PER_YEAR
}

/// Bucket a domain age: `> 3` years → 1.0, `[1, 3]` → 0.5, otherwise 0.0
pub fn age_score(age_years: f64) -> f64 {
    if age_years > 3.0 {
        MAX_SCORE
    } else if (1.0..=3.0).contains(&age_years) {
        NEUTRAL_SCORE
    } else {
        MIN_SCORE
    }
}

/// Parse a registry creation timestamp
///
/// Registries disagree on format; the common shapes are accepted and
/// anything else yields `None`.
pub fn parse_creation_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_grade_table() {
        assert_eq!(grade_score("A+"), 1.0);
        assert_eq!(grade_score("A"), 1.0);
        assert_eq!(grade_score("B"), 0.5);
        assert_eq!(grade_score("C"), 0.5);
        assert_eq!(grade_score("D"), 0.0);
        assert_eq!(grade_score("F"), 0.0);
        assert_eq!(grade_score("T"), 0.0);
    }

    #[test]
    fn test_unknown_grade_never_beats_worst() {
        for grade in ["", "A-", "M", "Z", "a+", "??"] {
            assert!(grade_score(grade) <= grade_score(WORST_GRADE), "grade {:?}", grade);
        }
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(age_score(10.0), 1.0);
        assert_eq!(age_score(3.01), 1.0);
        assert_eq!(age_score(3.0), 0.5);
        assert_eq!(age_score(2.0), 0.5);
        assert_eq!(age_score(1.0), 0.5);
        assert_eq!(age_score(0.99), 0.0);
        assert_eq!(age_score(0.0), 0.0);
        assert_eq!(age_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_age_years_uses_365_day_years() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let created = now - Duration::days(730);
        assert_eq!(age_years(created, now), 2.0);
    }

    #[test]
    fn test_parse_creation_date_formats() {
        let expected = Utc.with_ymd_and_hms(1997, 9, 15, 4, 0, 0).unwrap();
        assert_eq!(parse_creation_date("1997-09-15T04:00:00Z"), Some(expected));
        assert_eq!(parse_creation_date("1997-09-15T04:00:00+00:00"), Some(expected));
        assert_eq!(parse_creation_date("1997-09-15T04:00:00+0000"), Some(expected));
        assert_eq!(
            parse_creation_date("1997-09-15"),
            Some(Utc.with_ymd_and_hms(1997, 9, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_creation_date("N/A"), None);
        assert_eq!(parse_creation_date(""), None);
    }
}
