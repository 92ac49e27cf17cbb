//! Free-text amount normalization.
//!
//! Reads amounts such as "£500k", "1.5M", "$2,000" or "3 million" as plain
//! numbers. The currency itself is discarded.
//!
//! Scale detection is a plain substring scan over the whole text, so
//! "2000 bucks" is read as two trillion. Callers that need exact amounts
//! should ask for bare numbers.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d.]+").unwrap());

/// Scale words and suffixes, in the order they are checked.
const SCALES: [(&str, f64); 6] = [
    ("million", 1e6),
    ("billion", 1e9),
    ("thousand", 1e3),
    ("m", 1e6),
    ("b", 1e9),
    ("k", 1e3),
];

/// Parses an amount, returning `None` when the text holds no number.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.to_lowercase().replace(',', "");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let number: f64 = NUMERIC_PART.find(text)?.as_str().parse().ok()?;

    let multiplier = SCALES
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0);

    Some(number * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod plain_numbers {
        use super::*;

        #[test]
        fn empty_is_none() {
            assert_eq!(parse_amount(""), None);
        }

        #[test]
        fn text_without_digits_is_none() {
            assert_eq!(parse_amount("a lot"), None);
        }

        #[test]
        fn lone_decimal_point_is_none() {
            assert_eq!(parse_amount("."), None);
        }

        #[test]
        fn integer_is_returned_as_is() {
            assert_eq!(parse_amount("42"), Some(42.0));
        }

        #[test]
        fn thousands_separators_are_ignored() {
            assert_eq!(parse_amount("1,250,000"), Some(1_250_000.0));
        }

        #[test]
        fn currency_symbol_without_scale() {
            assert_eq!(parse_amount("$500"), Some(500.0));
            assert_eq!(parse_amount("€12.50"), Some(12.5));
        }
    }

    mod scale_words {
        use super::*;

        #[test]
        fn million() {
            assert_eq!(parse_amount("2 million"), Some(2_000_000.0));
        }

        #[test]
        fn billion() {
            assert_eq!(parse_amount("1.2 billion"), Some(1_200_000_000.0));
        }

        #[test]
        fn thousand() {
            assert_eq!(parse_amount("15 thousand"), Some(15_000.0));
        }
    }

    mod suffixes {
        use super::*;

        #[test]
        fn m_suffix_is_case_insensitive() {
            assert_eq!(parse_amount("1.5M"), Some(1_500_000.0));
        }

        #[test]
        fn k_suffix() {
            assert_eq!(parse_amount("20k"), Some(20_000.0));
        }

        #[test]
        fn b_suffix() {
            assert_eq!(parse_amount("3b"), Some(3_000_000_000.0));
        }

        #[test]
        fn symbol_and_suffix_combine() {
            assert_eq!(parse_amount("£500k"), Some(500_000.0));
        }

        #[test]
        fn first_number_wins() {
            assert_eq!(parse_amount("50k or 60k"), Some(50_000.0));
        }
    }

    mod substring_scan {
        use super::*;

        #[test]
        fn m_anywhere_beats_k() {
            // "make" contains both 'm' and 'k'; 'm' is checked first.
            assert_eq!(parse_amount("make it 5k"), Some(5_000_000.0));
        }

        #[test]
        fn m_in_a_later_word_scales_the_first_number() {
            assert_eq!(parse_amount("50k or maybe 60k"), Some(50_000_000.0));
        }

        #[test]
        fn b_anywhere_applies() {
            assert_eq!(parse_amount("2000 bucks"), Some(2_000_000_000_000.0));
        }
    }
}
