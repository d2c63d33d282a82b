//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A destination exactly as the caller typed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationQuery {
    pub raw_city: String,
    pub raw_country: String,
}

impl LocationQuery {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            raw_city: city.into(),
            raw_country: country.into(),
        }
    }
}

/// City/country pair after alias and region-code resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NormalizedLocation {
    pub city: String,
    pub country: String,
}

impl NormalizedLocation {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Free-text form used for geocoding: "Paris,France" or just "Paris".
    pub fn search_text(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{},{}", self.city, self.country)
        }
    }

    /// Human-readable form used in deep links: "Paris, France".
    pub fn display_text(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }
}

impl fmt::Display for NormalizedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// A validated WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Returns `None` when either component is non-finite or out of range.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Parse the string pair Nominatim returns.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse().ok()?;
        let lon = lon.trim().parse().ok()?;
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

// ─── Geocoding service payloads ─────────────────────────────────

/// Address breakdown returned with `addressdetails=1`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Address {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub hotel: Option<String>,
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
}

/// One entry of a forward search.
#[derive(Deserialize, Debug, Clone)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default, rename = "class")]
    pub place_class: Option<String>,
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default)]
    pub osm_id: Option<u64>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub extratags: Option<HashMap<String, String>>,
}

impl Place {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::parse(&self.lat, &self.lon)
    }

    pub fn country(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|a| a.country.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn website(&self) -> Option<&str> {
        self.extratags
            .as_ref()
            .and_then(|t| t.get("website"))
            .map(String::as_str)
    }
}

/// Result of a reverse lookup.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReversePlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Options for one forward search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub limit: usize,
    pub address_details: bool,
    pub extra_tags: bool,
    pub timeout: std::time::Duration,
}

impl SearchParams {
    pub fn top(timeout: std::time::Duration) -> Self {
        Self {
            limit: 1,
            address_details: false,
            extra_tags: false,
            timeout,
        }
    }

    pub fn with_address(mut self) -> Self {
        self.address_details = true;
        self
    }

    pub fn with_extra_tags(mut self) -> Self {
        self.extra_tags = true;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Geocoding client errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}

impl From<ureq::Error> for LocationError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => Self::Status {
                status,
                url: response.get_url().to_string(),
            },
            ureq::Error::Transport(t) => Self::Network(t.to_string()),
        }
    }
}
