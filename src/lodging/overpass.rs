//! Overpass API client and lodging POI queries.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

use super::types::{live_amenities, parse_stars, website_or_link, Candidate, PendingCandidate};
use crate::location::{Coordinate, NormalizedLocation};

/// Half-width of the primary search box, in degrees (≈33 km).
pub const PRIMARY_HALF_WIDTH_DEG: f64 = 0.3;

/// Half-width of the named-only fallback box, in degrees (≈111 km).
pub const FALLBACK_HALF_WIDTH_DEG: f64 = 1.0;

/// Server-side evaluation limit embedded in every query, in seconds.
const SERVER_TIMEOUT_SECS: u32 = 25;

const PRIMARY_FILTERS: &[&str] = &[
    r#"["tourism"="hotel"]"#,
    r#"["tourism"="guest_house"]"#,
    r#"["tourism"="hostel"]"#,
    r#"["tourism"="alpine_hut"]"#,
    r#"["tourism"="apartment"]"#,
    r#"["amenity"="hotel"]"#,
];

const NAMED_FILTERS: &[&str] = &[r#"["name"]["tourism"~"hotel|guest_house|hostel"]"#];

#[derive(Debug, Error)]
pub enum PoiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid Overpass response: {0}")]
    InvalidResponse(String),
}

impl From<ureq::Error> for PoiError {
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

/// Axis-aligned lat/lon box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box centred on `at`, clamped to valid latitude/longitude.
    pub fn around(at: Coordinate, half_width_deg: f64) -> Self {
        Self {
            south: (at.lat - half_width_deg).max(-90.0),
            west: (at.lon - half_width_deg).max(-180.0),
            north: (at.lat + half_width_deg).min(90.0),
            east: (at.lon + half_width_deg).min(180.0),
        }
    }

    /// Overpass order: south,west,north,east.
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Lodging,
    NamedLodging,
}

/// One Overpass QL query: a box plus tag filters over nodes and ways.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiQuery {
    pub bbox: BoundingBox,
    pub kind: QueryKind,
    filters: &'static [&'static str],
}

impl PoiQuery {
    /// Every hotel-like feature, named or not.
    pub fn lodging(at: Coordinate) -> Self {
        Self {
            bbox: BoundingBox::around(at, PRIMARY_HALF_WIDTH_DEG),
            kind: QueryKind::Lodging,
            filters: PRIMARY_FILTERS,
        }
    }

    /// Only hotels, guest houses and hostels that carry a name.
    pub fn named_lodging(at: Coordinate) -> Self {
        Self {
            bbox: BoundingBox::around(at, FALLBACK_HALF_WIDTH_DEG),
            kind: QueryKind::NamedLodging,
            filters: NAMED_FILTERS,
        }
    }

    pub fn to_ql(&self) -> String {
        let mut ql = format!(
            "[out:json][timeout:{}][bbox:{}];\n(\n",
            SERVER_TIMEOUT_SECS,
            self.bbox.to_overpass()
        );
        for filter in self.filters {
            let _ = writeln!(ql, "  node{};", filter);
            let _ = writeln!(ql, "  way{};", filter);
        }
        ql.push_str(");\nout center;\n");
        ql
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// A node or way from an `out center` response.
#[derive(Deserialize, Debug, Clone)]
pub struct PoiElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl PoiElement {
    /// Node position, or the centre Overpass computed for a way.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.center, self.lat, self.lon) {
            (Some(c), _, _) => Coordinate::new(c.lat, c.lon),
            (None, Some(lat), Some(lon)) => Coordinate::new(lat, lon),
            _ => None,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn source_id(&self) -> String {
        format!("osm-{}-{}", self.kind, self.id)
    }

    /// Map to a pending record; `None` when the element has no position.
    pub fn to_pending(&self, location: &NormalizedLocation) -> Option<PendingCandidate> {
        let at = self.coordinate()?;
        let name = self.tag("name").map(str::to_string);
        let description = self
            .tag("description")
            .or_else(|| self.tag("addr:street"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Hotel in {}", location.city));

        Some(PendingCandidate {
            id: self.source_id(),
            website: website_or_link(self.tag("website"), name.as_deref(), at, location),
            name,
            location: location.clone(),
            at,
            description,
            stars: parse_stars(self.tag("stars")),
            amenities: live_amenities(),
            leed: true,
        })
    }

    /// Map a named element straight to a candidate.
    pub fn to_named(&self, location: &NormalizedLocation) -> Option<Candidate> {
        let pending = self.to_pending(location)?;
        if !pending.is_named() {
            return None;
        }
        Some(pending.into_candidate(|p| p.id.clone()))
    }
}

#[derive(Deserialize, Debug)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<PoiElement>,
}

/// Anything that can answer a POI query.
pub trait PoiSource: Send + Sync {
    fn query(&self, query: &PoiQuery) -> Result<Vec<PoiElement>, PoiError>;
}

/// Blocking Overpass client.
#[derive(Clone)]
pub struct OverpassClient {
    agent: ureq::Agent,
    url: String,
    timeout: Duration,
}

impl OverpassClient {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(user_agent).build();
        Self {
            agent,
            url: url.to_string(),
            timeout,
        }
    }
}

impl PoiSource for OverpassClient {
    fn query(&self, query: &PoiQuery) -> Result<Vec<PoiElement>, PoiError> {
        let body = query.to_ql();
        let response: OverpassResponse = self
            .agent
            .post(&self.url)
            .timeout(self.timeout)
            .set("Accept", "application/json")
            .set("Content-Type", "text/plain")
            .send_string(&body)?
            .into_json()
            .map_err(|e| PoiError::InvalidResponse(e.to_string()))?;

        tracing::debug!(bbox = %query.bbox.to_overpass(), elements = response.elements.len(), "overpass query");
        Ok(response.elements)
    }
}

/// Run the primary lodging query and map every positioned element.
///
/// Order follows the service's response. Failures yield an empty list.
pub fn query_lodging(
    source: &dyn PoiSource,
    at: Coordinate,
    location: &NormalizedLocation,
) -> Vec<PendingCandidate> {
    match source.query(&PoiQuery::lodging(at)) {
        Ok(elements) => elements.iter().filter_map(|e| e.to_pending(location)).collect(),
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "lodging query failed");
            Vec::new()
        }
    }
}
