//! Free-text date normalization.
//!
//! Turns the date phrases people actually type ("in 3 months", "next year",
//! "March 2027", "15/04/2026") into calendar dates. Rules are tried in a
//! fixed order and the first one that matches wins.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Absolute formats, in priority order.
///
/// `%d/%m/%Y` is tried before `%m/%d/%Y`, so "03/04/2026" is read as
/// 3 April. There is no locale detection.
const ABSOLUTE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]* (\d{4})$").unwrap()
});

/// The year in an absolute format must be exactly four digits, at the start
/// (ISO) or at the end (everything else). `%Y` alone accepts any width.
static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-|\D\d{4}$").unwrap());

static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^20\d{2}$").unwrap());

/// Parses a date phrase relative to the local calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_date_from(text, Local::now().date_naive())
}

/// Parses a date phrase relative to `today`.
///
/// Returns `None` when no rule understands the text.
pub fn parse_date_from(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if text.starts_with("in ") {
        if let Some(date) = parse_relative_offset(&text, today) {
            return Some(date);
        }
    }

    match text.as_str() {
        "next month" => return first_of_next_month(today),
        "next year" => return NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
        _ => {}
    }

    parse_absolute(&text)
        .or_else(|| parse_month_year(&text))
        .or_else(|| parse_bare_year(&text))
}

fn parse_absolute(text: &str) -> Option<NaiveDate> {
    if !FOUR_DIGIT_YEAR.is_match(text) {
        return None;
    }
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// "in N days/weeks/months/years", with 30-day months and 365-day years.
fn parse_relative_offset(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let amount: u64 = FIRST_NUMBER.find(text)?.as_str().parse().ok()?;

    let days_per_unit = if text.contains("day") {
        1
    } else if text.contains("week") {
        7
    } else if text.contains("month") {
        30
    } else if text.contains("year") {
        365
    } else {
        return None;
    };

    today.checked_add_days(Days::new(amount.checked_mul(days_per_unit)?))
}

fn first_of_next_month(today: NaiveDate) -> Option<NaiveDate> {
    if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
}

/// "march 2027" or "mar 2027" → 1 March 2027.
fn parse_month_year(text: &str) -> Option<NaiveDate> {
    let captures = MONTH_YEAR.captures(text)?;
    let (word, _) = text.split_once(' ')?;
    let month = month_number(word)?;
    let year: i32 = captures.get(2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Accepts the full month name or its three-letter abbreviation only.
fn month_number(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|name| *name == word || &name[..3] == word)
        .map(|index| index as u32 + 1)
}

fn parse_bare_year(text: &str) -> Option<NaiveDate> {
    if !BARE_YEAR.is_match(text) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod empty_input {
        use super::*;

        #[test]
        fn empty_string_is_none() {
            assert_eq!(parse_date_from("", today()), None);
        }

        #[test]
        fn whitespace_is_none() {
            assert_eq!(parse_date_from("   ", today()), None);
        }
    }

    mod relative_offsets {
        use super::*;

        #[test]
        fn days_are_added_directly() {
            assert_eq!(parse_date_from("in 10 days", today()), Some(date(2026, 10, 26)));
        }

        #[test]
        fn weeks_are_seven_days() {
            assert_eq!(parse_date_from("in 2 weeks", today()), Some(today() + Days::new(14)));
        }

        #[test]
        fn months_are_flat_thirty_days() {
            assert_eq!(parse_date_from("in 3 months", today()), Some(today() + Days::new(90)));
        }

        #[test]
        fn years_are_flat_365_days() {
            assert_eq!(parse_date_from("in 2 years", today()), Some(today() + Days::new(730)));
        }

        #[test]
        fn unit_match_is_case_insensitive() {
            assert_eq!(parse_date_from("In 1 YEAR", today()), Some(today() + Days::new(365)));
        }

        #[test]
        fn phrase_without_number_falls_through() {
            assert_eq!(parse_date_from("in a few years", today()), None);
        }

        #[test]
        fn phrase_without_unit_falls_through() {
            assert_eq!(parse_date_from("in 5 decades", today()), None);
        }

        #[test]
        fn overflow_is_none() {
            assert_eq!(parse_date_from("in 99999999999 years", today()), None);
        }
    }

    mod named_periods {
        use super::*;

        #[test]
        fn next_month_is_first_of_following_month() {
            assert_eq!(parse_date_from("next month", today()), Some(date(2026, 11, 1)));
        }

        #[test]
        fn next_month_wraps_december() {
            let december = date(2026, 12, 20);
            assert_eq!(parse_date_from("next month", december), Some(date(2027, 1, 1)));
        }

        #[test]
        fn next_year_is_first_of_january() {
            assert_eq!(parse_date_from("Next Year", today()), Some(date(2027, 1, 1)));
        }

        #[test]
        fn next_month_must_be_exact() {
            assert_eq!(parse_date_from("sometime next month", today()), None);
        }
    }

    mod absolute_formats {
        use super::*;

        #[test]
        fn iso_dates_parse() {
            assert_eq!(parse_date_from("1990-05-01", today()), Some(date(1990, 5, 1)));
        }

        #[test]
        fn day_first_wins_when_ambiguous() {
            assert_eq!(parse_date_from("03/04/2025", today()), Some(date(2025, 4, 3)));
        }

        #[test]
        fn month_first_used_when_day_first_is_invalid() {
            assert_eq!(parse_date_from("12/25/2025", today()), Some(date(2025, 12, 25)));
        }

        #[test]
        fn full_month_name_with_day() {
            assert_eq!(parse_date_from("March 5, 2027", today()), Some(date(2027, 3, 5)));
        }

        #[test]
        fn abbreviated_month_name_with_day() {
            assert_eq!(parse_date_from("Aug 20, 2028", today()), Some(date(2028, 8, 20)));
        }

        #[test]
        fn two_digit_year_is_none() {
            assert_eq!(parse_date_from("12/31/30", today()), None);
            assert_eq!(parse_date_from("30-12-31", today()), None);
            assert_eq!(parse_date_from("March 5, 27", today()), None);
        }

        #[test]
        fn five_digit_year_is_none() {
            assert_eq!(parse_date_from("01/02/20265", today()), None);
        }

        #[test]
        fn invalid_calendar_date_is_none() {
            assert_eq!(parse_date_from("2025-02-30", today()), None);
        }
    }

    mod month_and_year {
        use super::*;

        #[test]
        fn full_month_name_gives_first_day() {
            assert_eq!(parse_date_from("March 2025", today()), Some(date(2025, 3, 1)));
        }

        #[test]
        fn abbreviation_gives_first_day() {
            assert_eq!(parse_date_from("dec 2030", today()), Some(date(2030, 12, 1)));
        }

        #[test]
        fn non_standard_abbreviation_is_none() {
            assert_eq!(parse_date_from("sept 2030", today()), None);
        }
    }

    mod bare_year {
        use super::*;

        #[test]
        fn twenty_first_century_year_is_first_of_january() {
            assert_eq!(parse_date_from("2030", today()), Some(date(2030, 1, 1)));
        }

        #[test]
        fn other_centuries_are_not_matched() {
            assert_eq!(parse_date_from("1999", today()), None);
        }

        #[test]
        fn free_text_is_none() {
            assert_eq!(parse_date_from("whenever I can afford it", today()), None);
        }
    }

    #[test]
    fn parse_date_uses_local_today() {
        let local_today = Local::now().date_naive();
        let parsed = parse_date("in 1 day").unwrap();
        // Allow for a midnight rollover between the two reads.
        assert!(parsed == local_today + Days::new(1) || parsed == local_today + Days::new(2));
    }

    proptest! {
        #[test]
        fn iso_dates_round_trip(year in 1000i32..=9999, ordinal in 1u32..=365) {
            let original = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            let text = original.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_date_from(&text, today()), Some(original));
        }
    }
}
