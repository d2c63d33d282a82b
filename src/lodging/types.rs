//! Lodging records and result sets.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;

use crate::location::{Coordinate, NormalizedLocation};

/// Default star rating when the source has none.
pub const DEFAULT_STARS: u8 = 3;

/// Labels attached to every live record. A naming convention for the
/// sustainability-themed search, not a certification check.
pub const LIVE_AMENITIES: [&str; 2] = ["eco-friendly", "sustainable"];

const SUSTAINABILITY_KEYWORDS: &[&str] = &[
    "eco",
    "green",
    "sustainable",
    "carbon",
    "leed",
    "earthcheck",
    "green key",
    "green globe",
    "energy",
    "solar",
    "renewable",
];

/// `encodeURIComponent` set: everything but alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A named lodging record, ready to leave the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub description: String,
    pub stars: u8,
    pub amenities: Vec<String>,
    pub leed: bool,
    pub website: String,
}

impl Candidate {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.lat, self.lon)
    }

    /// Whether any sustainability keyword appears in the record's text.
    pub fn mentions_sustainability(&self) -> bool {
        let haystack = format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.website,
            self.amenities.join(" ")
        )
        .to_lowercase();
        SUSTAINABILITY_KEYWORDS.iter().any(|k| haystack.contains(k))
    }
}

/// A record that may still lack a name.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCandidate {
    pub id: String,
    pub name: Option<String>,
    pub location: NormalizedLocation,
    pub at: Coordinate,
    pub description: String,
    pub stars: u8,
    pub amenities: Vec<String>,
    pub leed: bool,
    pub website: String,
}

impl PendingCandidate {
    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Finish the record. An existing name always wins over `fallback`.
    pub fn into_candidate(self, fallback: impl FnOnce(&Self) -> String) -> Candidate {
        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => fallback(&self),
        };
        Candidate {
            id: self.id,
            name,
            city: self.location.city,
            country: self.location.country,
            lat: self.at.lat,
            lon: self.at.lon,
            description: self.description,
            stars: self.stars,
            amenities: self.amenities,
            leed: self.leed,
            website: self.website,
        }
    }
}

/// Where the returned records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceLabel {
    #[serde(rename = "live-only")]
    Live,
    #[serde(rename = "live+static")]
    LiveAndStatic,
    #[serde(rename = "static-only")]
    StaticOnly,
}

impl SourceLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live-only",
            Self::LiveAndStatic => "live+static",
            Self::StaticOnly => "static-only",
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub candidates: Vec<Candidate>,
    pub source: SourceLabel,
}

// ─── Links ──────────────────────────────────────────────────────

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Prefix a scheme when the tag value lacks one.
pub fn normalize_website(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http") {
        Some(raw.to_string())
    } else {
        Some(format!("https://{}", raw))
    }
}

/// Map search deep link for a record without its own website.
pub fn maps_search_link(subject: &str, location: &NormalizedLocation) -> String {
    format!(
        "https://www.google.com/maps/search/{}+{}",
        encode_component(subject),
        encode_component(&location.display_text())
    )
}

/// Website tag if usable, else a deep link built from the name or coordinate.
pub fn website_or_link(
    tag: Option<&str>,
    name: Option<&str>,
    at: Coordinate,
    location: &NormalizedLocation,
) -> String {
    if let Some(site) = tag.and_then(normalize_website) {
        return site;
    }
    let subject = match name {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => format!("hotel {} {}", at.lat, at.lon),
    };
    maps_search_link(&subject, location)
}

/// Leading integer of a stars tag ("4", "4S", "3.5"), clamped to 1..=5.
pub fn parse_stars(tag: Option<&str>) -> u8 {
    let Some(tag) = tag else {
        return DEFAULT_STARS;
    };
    let digits: String = tag.trim().chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_STARS,
        Ok(n) => n.min(5) as u8,
    }
}

pub fn live_amenities() -> Vec<String> {
    LIVE_AMENITIES.iter().map(|a| a.to_string()).collect()
}
