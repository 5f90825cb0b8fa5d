//! Bulletin date handling.
//!
//! The source site labels bulletins with day-first dates using `.`, `-` or `/`
//! as separators. Everything stored on disk uses the `DD.MM.YYYY` form.

use chrono::NaiveDate;
use std::cmp::Ordering;

/// Canonical textual form of an observation date: "DD.MM.YYYY"
pub const DATE_FORMAT: &str = "%d.%m.%Y";

const ACCEPTED_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d-%m-%Y", "%d/%m/%Y"];

/// A date label as read from a bulletin or a stored observation.
///
/// Labels that do not parse are carried through untouched so callers must
/// decide what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservationDate {
    Parsed(NaiveDate),
    Unparseable(String),
}

impl ObservationDate {
    /// Parse a date label. The whole trimmed text is tried first, then each
    /// whitespace separated token, so headings like "Dam Level 16.07.2025"
    /// still resolve.
    pub fn parse(text: &str) -> ObservationDate {
        let trimmed = text.trim();
        if let Some(date) = parse_exact(trimmed) {
            return ObservationDate::Parsed(date);
        }
        trimmed
            .split_whitespace()
            .find_map(parse_exact)
            .map(ObservationDate::Parsed)
            .unwrap_or_else(|| ObservationDate::Unparseable(text.to_string()))
    }

    pub fn as_naive_date(&self) -> Option<NaiveDate> {
        match self {
            ObservationDate::Parsed(date) => Some(*date),
            ObservationDate::Unparseable(_) => None,
        }
    }

    /// "DD.MM.YYYY" for parsed dates, the original text otherwise.
    pub fn canonical(&self) -> String {
        match self {
            ObservationDate::Parsed(date) => date.format(DATE_FORMAT).to_string(),
            ObservationDate::Unparseable(raw) => raw.clone(),
        }
    }

    /// Whether two labels name the same bulletin day.
    pub fn same_day(&self, other: &ObservationDate) -> bool {
        match (self, other) {
            (ObservationDate::Parsed(a), ObservationDate::Parsed(b)) => a == b,
            (ObservationDate::Unparseable(a), ObservationDate::Unparseable(b)) => {
                a.trim() == b.trim()
            }
            _ => false,
        }
    }

    /// Most recent first; unparseable labels sort after every parsed date
    /// and compare equal to each other so a stable sort keeps their order.
    pub fn cmp_descending(&self, other: &ObservationDate) -> Ordering {
        match (self, other) {
            (ObservationDate::Parsed(a), ObservationDate::Parsed(b)) => b.cmp(a),
            (ObservationDate::Parsed(_), ObservationDate::Unparseable(_)) => Ordering::Less,
            (ObservationDate::Unparseable(_), ObservationDate::Parsed(_)) => Ordering::Greater,
            (ObservationDate::Unparseable(_), ObservationDate::Unparseable(_)) => Ordering::Equal,
        }
    }

    /// True only when both dates parse and `self` is strictly earlier.
    pub fn is_earlier_than(&self, other: &ObservationDate) -> bool {
        match (self, other) {
            (ObservationDate::Parsed(a), ObservationDate::Parsed(b)) => a < b,
            _ => false,
        }
    }
}

/// `%Y` alone accepts any digit count, so "16.07.25" would be year 25.
fn has_four_digit_year(text: &str) -> bool {
    text.rsplit(|c| matches!(c, '.' | '-' | '/'))
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_exact(text: &str) -> Option<NaiveDate> {
    if !has_four_digit_year(text) {
        return None;
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Standardize a date label to "DD.MM.YYYY", leaving it unmodified when it
/// cannot be parsed.
pub fn standardize(text: &str) -> String {
    match ObservationDate::parse(text) {
        ObservationDate::Parsed(date) => date.format(DATE_FORMAT).to_string(),
        ObservationDate::Unparseable(_) => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_separators() {
        for text in ["16.07.2025", "16-07-2025", "16/07/2025", " 16.07.2025 "] {
            assert_eq!(ObservationDate::parse(text), ObservationDate::Parsed(ymd(2025, 7, 16)));
        }
    }

    #[test]
    fn test_two_digit_year_is_unparseable() {
        for text in ["16.07.25", "16-07-25", "16/07/025", "16.07.20255"] {
            assert_eq!(ObservationDate::parse(text), ObservationDate::Unparseable(text.to_string()));
        }
        assert_eq!(standardize("16.07.25"), "16.07.25");
        assert_eq!(standardize("Dam Level 16.07.25"), "Dam Level 16.07.25");
    }

    #[test]
    fn test_parse_single_digit_fields() {
        assert_eq!(ObservationDate::parse("3.6.2025"), ObservationDate::Parsed(ymd(2025, 6, 3)));
    }

    #[test]
    fn test_parse_date_inside_heading() {
        let parsed = ObservationDate::parse("Dam Level Data 05.07.2025");
        assert_eq!(parsed.as_naive_date(), Some(ymd(2025, 7, 5)));
    }

    #[test]
    fn test_unparseable_keeps_text() {
        let parsed = ObservationDate::parse("yesterday");
        assert_eq!(parsed, ObservationDate::Unparseable("yesterday".to_string()));
        assert_eq!(parsed.canonical(), "yesterday");
        assert_eq!(standardize("31.02.2025"), "31.02.2025");
    }

    #[test]
    fn test_standardize() {
        assert_eq!(standardize("5/7/2025"), "05.07.2025");
        assert_eq!(standardize("16-07-2025"), "16.07.2025");
    }

    #[test]
    fn test_same_day_across_formats() {
        let a = ObservationDate::parse("16.07.2025");
        let b = ObservationDate::parse("16/07/2025");
        assert!(a.same_day(&b));
        assert!(!a.same_day(&ObservationDate::parse("15.07.2025")));
        assert!(!a.same_day(&ObservationDate::parse("n/a")));
    }

    #[test]
    fn test_descending_sort_puts_unparseable_last() {
        let mut dates = vec![
            ObservationDate::parse("14.07.2025"),
            ObservationDate::parse("???"),
            ObservationDate::parse("16.07.2025"),
            ObservationDate::parse("15.07.2025"),
        ];
        dates.sort_by(|a, b| a.cmp_descending(b));
        let labels: Vec<String> = dates.iter().map(|d| d.canonical()).collect();
        assert_eq!(labels, vec!["16.07.2025", "15.07.2025", "14.07.2025", "???"]);
    }
}
