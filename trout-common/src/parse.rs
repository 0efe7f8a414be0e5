///! Parsers for the string-encoded fields written by the stocking report scraper

use chrono::NaiveDate;

use crate::error::ParseError;

/// Date format used by the stocking report, e.g. "Jan 05, 2024"
pub const STOCKED_DATE_FORMAT: &str = "%b %d, %Y";

/// Parse "Jan 05, 2024" (or "January 05, 2024") into a calendar date.
pub fn parse_stocked_date(text: &str) -> Result<NaiveDate, ParseError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, STOCKED_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(text, "%B %d, %Y"))
        .map_err(|_| ParseError::Date(text.to_string()))
}

pub fn format_stocked_date(date: NaiveDate) -> String {
    date.format(STOCKED_DATE_FORMAT).to_string()
}

/// Parse a fish count with thousands separators ("1,234" -> 1234).
pub fn parse_fish_count(text: &str) -> Result<u64, ParseError> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u64>()
        .map_err(|_| ParseError::FishCount(text.trim().to_string()))
}

pub fn parse_coordinate(text: &str, axis: &'static str) -> Result<f64, ParseError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::Coordinate {
            axis,
            value: text.trim().to_string(),
        }),
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// "LAKE O'NEIL" becomes "Lake O'Neil".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// Upper-case the first character and lower-case everything after it.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stocked_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_stocked_date("Jan 05, 2024").unwrap(), expected);
        assert_eq!(parse_stocked_date("  Jan 5, 2024 ").unwrap(), expected);
        assert_eq!(parse_stocked_date("January 05, 2024").unwrap(), expected);
        assert_eq!(
            parse_stocked_date("2024-01-05"),
            Err(ParseError::Date("2024-01-05".to_string()))
        );
        assert_eq!(format_stocked_date(expected), "Jan 05, 2024");
    }

    #[test]
    fn test_parse_fish_count() {
        assert_eq!(parse_fish_count("1,234").unwrap(), 1234);
        assert_eq!(parse_fish_count("1,234,567").unwrap(), 1_234_567);
        assert_eq!(parse_fish_count(" 80 ").unwrap(), 80);
        assert!(parse_fish_count("").is_err());
        assert!(parse_fish_count("-5").is_err());
        assert!(parse_fish_count("12a").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("47.7511", "latitude").unwrap(), 47.7511);
        assert_eq!(parse_coordinate("-120.7401", "longitude").unwrap(), -120.7401);
        assert!(parse_coordinate("NaN", "latitude").is_err());
        assert!(parse_coordinate("", "longitude").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("BATTLE GROUND LK"), "Battle Ground Lk");
        assert_eq!(title_case("lake o'neil"), "Lake O'Neil");
        assert_eq!(title_case("big lake (skagit)"), "Big Lake (Skagit)");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("BATTLE GROUND LK"), "Battle ground lk");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }
}
