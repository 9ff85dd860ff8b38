//! Pure text parsers: phone numbers, street addresses, dates, and email.
//! All of them fail with a [`ParseError`] and never return a partial result.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Two-digit prefixes that mark a mobile number in the default region.
const GSM_PREFIXES: &[&str] = &[
    "50", "51", "53", "57", "60", "66", "69", "72", "73", "78", "79", "88",
];

/// Whole-word long forms replaced by their abbreviations in street names.
const STREET_ABBREVIATIONS: &[(&str, &str)] = &[
    ("aleje", "Al."),
    ("avenue", "Av."),
    ("road", "Rd."),
    ("square", "Sq."),
    ("street", "St."),
    ("drive", "Dr."),
];

/// Selects the pattern family used when parsing a phone number.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhoneRegion {
    #[default]
    Pl,
    Us,
}

/// One parsed phone number: the three derived fields always travel together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneNumber {
    /// Digits only, separators stripped.
    pub digits: String,
    /// Area-code capture; empty when the number carried none.
    pub area: String,
    /// The matched grouping with its original separators preserved.
    pub display: String,
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

/// Parse a free-form phone number string.
///
/// For [`PhoneRegion::Pl`], a mobile-prefixed number splits 3-3-3 and any
/// other number 3-2-2, both with an optional two-digit area code and
/// arbitrary non-digit separators. [`PhoneRegion::Us`] uses a three-digit
/// area code followed by 3-4-n digit groups.
pub fn parse_phone(input: &str, region: PhoneRegion) -> Result<PhoneNumber, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Blank);
    }

    let pattern = match region {
        PhoneRegion::Pl => {
            if GSM_PREFIXES.contains(&input.get(0..2).unwrap_or("")) {
                regex(r"(\d{0,2})\D*(\d{3}\D*\d{3}\D*\d{3})$")
            } else {
                regex(r"(\d{0,2})\D*(\d{3}\D*\d{2}\D*\d{2})$")
            }
        }
        PhoneRegion::Us => regex(r"(\d{3})\D*(\d{3}\D*\d{4}\D*\d+)$"),
    };

    let caps = pattern.captures(input).ok_or(ParseError::PhoneFormat)?;
    let area = caps[1].to_string();
    let display = caps[2].to_string();
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    Ok(PhoneNumber {
        digits,
        area,
        display,
    })
}

/// Parse a combined street string such as `"baker street 64"` or
/// `"129 broad road"`; the leading character decides the layout.
pub fn parse_street(input: &str) -> Result<(String, String), ParseError> {
    if input.is_empty() {
        return Err(ParseError::Blank);
    }

    let (name, number) = if input.starts_with(|c: char| c.is_ascii_digit()) {
        let caps = regex(r"^(\d+)\W+(\w+\W*\w*\W*)$")
            .captures(input)
            .ok_or(ParseError::StreetFormat)?;
        (caps[2].to_string(), caps[1].to_string())
    } else {
        let caps = regex(r"^(\w+\W*\w*\s*)\W+(\d+)$")
            .captures(input)
            .ok_or(ParseError::StreetFormat)?;
        (caps[1].to_string(), caps[2].to_string())
    };
    Ok((abbreviate_street_name(&name), number))
}

/// Parse a street given as two separate parts, in either order: when the
/// first part starts with a digit it is taken as the number.
pub fn parse_street_pair(first: &str, second: &str) -> Result<(String, String), ParseError> {
    if first.is_empty() {
        return Err(ParseError::Blank);
    }
    let (name, number) = if first.starts_with(|c: char| c.is_ascii_digit()) {
        (second, first)
    } else {
        (first, second)
    };
    Ok((abbreviate_street_name(name), number.to_string()))
}

fn abbreviate_street_name(name: &str) -> String {
    let mut name = name.to_lowercase();
    for (long, abbr) in STREET_ABBREVIATIONS {
        name = regex(&format!(r"\b{long}\b"))
            .replace_all(&name, *abbr)
            .into_owned();
    }
    title_case(&name)
}

/// Parse a `day-month-year` date with `-`, `/` or `.` separators, leading
/// zeros tolerated. Returns `(year, month, day)`; calendar legality (day 31
/// in a 30-day month) is the caller's concern, not this function's.
pub fn parse_date(input: &str) -> Result<(i32, u32, u32), ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Blank);
    }
    let stripped = regex(r"\b0").replace_all(input, "");
    let caps = regex(r"\s*([1-9]|[12][0-9]|3[01])[-/.]([1-9]|1[0-2])[-/.](\d{4})\s*")
        .captures(&stripped)
        .ok_or(ParseError::DateFormat)?;
    let day = caps[1].parse().map_err(|_| ParseError::DateFormat)?;
    let month = caps[2].parse().map_err(|_| ParseError::DateFormat)?;
    let year = caps[3].parse().map_err(|_| ParseError::DateFormat)?;
    Ok((year, month, day))
}

/// Check that a string can pass for an email address: it must contain both
/// an `@` and a `.`, nothing more is required.
pub fn valid_email(input: &str) -> Result<&str, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Blank);
    }
    if !input.contains('@') || !input.contains('.') {
        return Err(ParseError::EmailFormat);
    }
    Ok(input)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut start_of_word = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if start_of_word {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(ch);
            start_of_word = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_mobile_forms() {
        for raw in ["668678678", "668-678-678", "668.678.678", "668 678 678"] {
            let parsed = parse_phone(raw, PhoneRegion::Pl).unwrap();
            assert_eq!(parsed.digits, "668678678");
            assert_eq!(parsed.area, "");
        }
        assert_eq!(
            parse_phone("668-678-678", PhoneRegion::Pl).unwrap().display,
            "668-678-678"
        );
    }

    #[test]
    fn phone_landline_splits_area_code() {
        for raw in ["425109999", "(42)5109999", "(42) 5109999", "42 510 99 99"] {
            let parsed = parse_phone(raw, PhoneRegion::Pl).unwrap();
            assert_eq!(parsed.digits, "5109999");
            assert_eq!(parsed.area, "42");
        }
    }

    #[test]
    fn phone_us_region() {
        let parsed = parse_phone("212 555 01234", PhoneRegion::Us).unwrap();
        assert_eq!(parsed.area, "212");
        assert_eq!(parsed.digits, "55501234");
    }

    #[test]
    fn phone_rejects_short_and_blank() {
        assert_eq!(
            parse_phone("66867867", PhoneRegion::Pl),
            Err(ParseError::PhoneFormat)
        );
        assert_eq!(parse_phone("", PhoneRegion::Pl), Err(ParseError::Blank));
        assert_eq!(parse_phone("   ", PhoneRegion::Pl), Err(ParseError::Blank));
    }

    #[test]
    fn street_combined_both_layouts() {
        assert_eq!(
            parse_street("baker street 64").unwrap(),
            ("Baker St.".to_string(), "64".to_string())
        );
        assert_eq!(
            parse_street("129 broad Road").unwrap(),
            ("Broad Rd.".to_string(), "129".to_string())
        );
        assert_eq!(
            parse_street("640 madison AVENUE").unwrap(),
            ("Madison Av.".to_string(), "640".to_string())
        );
        assert_eq!(
            parse_street("aleje Jerozolimskie 9").unwrap(),
            ("Al. Jerozolimskie".to_string(), "9".to_string())
        );
        assert_eq!(
            parse_street("32 Mulholland drive").unwrap(),
            ("Mulholland Dr.".to_string(), "32".to_string())
        );
    }

    #[test]
    fn street_pair_swaps_on_leading_digit() {
        assert_eq!(
            parse_street_pair("tverskaya", "54").unwrap(),
            ("Tverskaya".to_string(), "54".to_string())
        );
        assert_eq!(
            parse_street_pair("54", "tverskaya").unwrap(),
            ("Tverskaya".to_string(), "54".to_string())
        );
    }

    #[test]
    fn street_rejects_empty_and_garbage() {
        assert_eq!(parse_street(""), Err(ParseError::Blank));
        assert_eq!(parse_street("???"), Err(ParseError::StreetFormat));
        assert_eq!(parse_street_pair("", "10"), Err(ParseError::Blank));
    }

    #[test]
    fn date_strips_leading_zeros() {
        assert_eq!(parse_date("01-10-1968").unwrap(), (1968, 10, 1));
        assert_eq!(parse_date("31/01/1968").unwrap(), (1968, 1, 31));
        assert_eq!(parse_date("24.12.2001").unwrap(), (2001, 12, 24));
        assert_eq!(parse_date(" 8-1-2016 ").unwrap(), (2016, 1, 8));
    }

    #[test]
    fn date_rejects_year_first_and_out_of_range() {
        assert_eq!(parse_date("1968-10-01"), Err(ParseError::DateFormat));
        assert_eq!(parse_date("1-13-2000"), Err(ParseError::DateFormat));
        assert_eq!(parse_date(""), Err(ParseError::Blank));
    }

    #[test]
    fn email_needs_at_and_dot() {
        assert!(valid_email("johndoe@example.com").is_ok());
        assert_eq!(valid_email("johndoe.example"), Err(ParseError::EmailFormat));
        assert_eq!(valid_email("johndoe@example"), Err(ParseError::EmailFormat));
        assert_eq!(valid_email(""), Err(ParseError::Blank));
    }

    #[test]
    fn title_case_matches_word_runs() {
        assert_eq!(title_case("los angeles"), "Los Angeles");
        assert_eq!(title_case("bAKER sT."), "Baker St.");
        assert_eq!(title_case("129 broad"), "129 Broad");
    }
}
