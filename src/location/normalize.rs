//! Canonicalizes raw city/country text before any network call.
//!
//! Handles "City, Country" input in a single field, common country
//! aliases, and US state codes given where a country was expected.

use super::types::{LocationQuery, NormalizedLocation};

pub const UNITED_KINGDOM: &str = "United Kingdom";
pub const USA: &str = "USA";

const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Map an alias to its canonical country label. Exact match only.
pub fn country_alias(name: &str) -> Option<&'static str> {
    let n = name.trim().to_lowercase();
    let canonical = match n.as_str() {
        "uk" | "u.k." | "great britain" | "britain" | "england" | "scotland" | "wales"
        | "northern ireland" => UNITED_KINGDOM,
        "us" | "u.s." | "usa" | "u.s.a." | "united states" | "united states of america"
        | "america" => USA,
        _ => return None,
    };
    Some(canonical)
}

/// Upper-cased state code if `token` is one.
pub fn us_state_code(token: &str) -> Option<&'static str> {
    let upper = token.trim().to_uppercase();
    US_STATE_CODES.iter().copied().find(|code| *code == upper)
}

/// Normalize a caller query. Never fails; falls back to the input strings.
pub fn normalize(query: &LocationQuery) -> NormalizedLocation {
    normalize_parts(&query.raw_city, &query.raw_country)
}

pub fn normalize_parts(raw_city: &str, raw_country: &str) -> NormalizedLocation {
    let mut city = raw_city.trim().to_string();
    let mut country = raw_country.trim().to_string();

    // "London, UK" → ("London", "UK")
    if country.is_empty() {
        if let Some((head, tail)) = split_trailing_fragment(&city) {
            city = head;
            country = tail;
        }
    }

    if let Some(canonical) = country_alias(&country) {
        country = canonical.to_string();
    }

    if let Some(code) = us_state_code(&country) {
        country = USA.to_string();
        if !city.is_empty() && !carries_state_code(&city, code) {
            city = format!("{}, {}", city, code);
        }
    }

    NormalizedLocation {
        city: if city.is_empty() { raw_city.to_string() } else { city },
        country: if country.is_empty() { raw_country.to_string() } else { country },
    }
}

/// Split on the last comma when both sides are non-empty.
fn split_trailing_fragment(text: &str) -> Option<(String, String)> {
    let (head, tail) = text.rsplit_once(',')?;
    let (head, tail) = (head.trim(), tail.trim());
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((head.to_string(), tail.to_string()))
}

fn carries_state_code(city: &str, code: &str) -> bool {
    city.split(',')
        .skip(1)
        .any(|part| part.trim().eq_ignore_ascii_case(code))
}
