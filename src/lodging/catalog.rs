//! Built-in catalog of sustainability-themed stays.
//!
//! Serves as the floor under the live search: 50 US cities with ten
//! variants each, plus a handful of international entries.

use super::types::{encode_component, Candidate};
use crate::location::country_alias;

struct UsCity {
    city: &'static str,
    state: &'static str,
    lat: f64,
    lon: f64,
}

struct Variant {
    suffix: &'static str,
    amenities: [&'static str; 2],
    stars: u8,
    lat_offset: f64,
    lon_offset: f64,
}

const fn city(city: &'static str, state: &'static str, lat: f64, lon: f64) -> UsCity {
    UsCity { city, state, lat, lon }
}

const US_CITIES: &[UsCity] = &[
    city("New York", "NY", 40.7128, -74.0060),
    city("Los Angeles", "CA", 34.0522, -118.2437),
    city("Chicago", "IL", 41.8781, -87.6298),
    city("Houston", "TX", 29.7604, -95.3698),
    city("Phoenix", "AZ", 33.4484, -112.0740),
    city("Philadelphia", "PA", 39.9526, -75.1652),
    city("San Antonio", "TX", 29.4241, -98.4936),
    city("San Diego", "CA", 32.7157, -117.1611),
    city("Dallas", "TX", 32.7767, -96.7970),
    city("San Jose", "CA", 37.3382, -121.8863),
    city("Austin", "TX", 30.2672, -97.7431),
    city("Jacksonville", "FL", 30.3322, -81.6557),
    city("Fort Worth", "TX", 32.7555, -97.3308),
    city("Columbus", "OH", 39.9612, -82.9988),
    city("Charlotte", "NC", 35.2271, -80.8431),
    city("San Francisco", "CA", 37.7749, -122.4194),
    city("Indianapolis", "IN", 39.7684, -86.1581),
    city("Seattle", "WA", 47.6062, -122.3321),
    city("Denver", "CO", 39.7392, -104.9903),
    city("Washington", "DC", 38.9072, -77.0369),
    city("Boston", "MA", 42.3601, -71.0589),
    city("El Paso", "TX", 31.7619, -106.4850),
    city("Nashville", "TN", 36.1627, -86.7816),
    city("Detroit", "MI", 42.3314, -83.0458),
    city("Oklahoma City", "OK", 35.4676, -97.5164),
    city("Portland", "OR", 45.5152, -122.6784),
    city("Las Vegas", "NV", 36.1699, -115.1398),
    city("Memphis", "TN", 35.1495, -90.0490),
    city("Louisville", "KY", 38.2527, -85.7585),
    city("Baltimore", "MD", 39.2904, -76.6122),
    city("Milwaukee", "WI", 43.0389, -87.9065),
    city("Albuquerque", "NM", 35.0844, -106.6504),
    city("Tucson", "AZ", 32.2226, -110.9747),
    city("Fresno", "CA", 36.7378, -119.7871),
    city("Mesa", "AZ", 33.4152, -111.8315),
    city("Sacramento", "CA", 38.5816, -121.4944),
    city("Atlanta", "GA", 33.7490, -84.3880),
    city("Kansas City", "MO", 39.0997, -94.5786),
    city("Colorado Springs", "CO", 38.8339, -104.8214),
    city("Miami", "FL", 25.7617, -80.1918),
    city("Raleigh", "NC", 35.7796, -78.6382),
    city("Omaha", "NE", 41.2565, -95.9345),
    city("Long Beach", "CA", 33.7701, -118.1937),
    city("Virginia Beach", "VA", 36.8529, -75.9780),
    city("Oakland", "CA", 37.8044, -122.2711),
    city("Minneapolis", "MN", 44.9778, -93.2650),
    city("Tulsa", "OK", 36.1540, -95.9928),
    city("Arlington", "TX", 32.7357, -97.1081),
    city("Tampa", "FL", 27.9506, -82.4572),
    city("New Orleans", "LA", 29.9511, -90.0715),
];

const VARIANTS: &[Variant] = &[
    Variant { suffix: "Eco Stay", amenities: ["energy", "recycling"], stars: 4, lat_offset: 0.01, lon_offset: 0.01 },
    Variant { suffix: "Green Suites", amenities: ["water conservation", "led lighting"], stars: 3, lat_offset: -0.01, lon_offset: 0.008 },
    Variant { suffix: "Solar Lodge", amenities: ["solar", "ev charging"], stars: 4, lat_offset: 0.006, lon_offset: -0.009 },
    Variant { suffix: "Low Carbon Hotel", amenities: ["low carbon", "recycling"], stars: 4, lat_offset: 0.014, lon_offset: -0.002 },
    Variant { suffix: "Renewable Inn", amenities: ["renewable", "energy"], stars: 3, lat_offset: -0.012, lon_offset: 0.012 },
    Variant { suffix: "Eco Loft", amenities: ["led lighting", "energy"], stars: 3, lat_offset: 0.004, lon_offset: 0.015 },
    Variant { suffix: "Green Key Hotel", amenities: ["green key", "recycling"], stars: 4, lat_offset: -0.015, lon_offset: -0.004 },
    Variant { suffix: "Sustainable House", amenities: ["sustainable", "water conservation"], stars: 3, lat_offset: 0.018, lon_offset: 0.005 },
    Variant { suffix: "Urban Eco Hotel", amenities: ["energy", "low carbon"], stars: 4, lat_offset: -0.006, lon_offset: -0.014 },
    Variant { suffix: "Eco Residence", amenities: ["solar", "organic"], stars: 4, lat_offset: 0.009, lon_offset: -0.016 },
];

fn international() -> Vec<Candidate> {
    let entry = |id: &str,
                 name: &str,
                 city: &str,
                 country: &str,
                 (lat, lon): (f64, f64),
                 description: &str,
                 stars: u8,
                 amenities: &[&str]| Candidate {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        lat,
        lon,
        description: description.to_string(),
        stars,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        leed: true,
        website: maps_link(&format!("{} {}", name, city)),
    };

    vec![
        entry(
            "basic-paris-1",
            "Green Haven Hotel",
            "Paris",
            "France",
            (48.8566, 2.3522),
            "Eco-chic hotel with bike rental",
            4,
            &["bike rental", "organic food"],
        ),
        entry(
            "basic-london-1",
            "River Green Hotel",
            "London",
            "United Kingdom",
            (51.5074, -0.1278),
            "City hotel with renewable energy features",
            4,
            &["renewable", "energy", "recycling"],
        ),
        entry(
            "basic-tokyo-1",
            "Green Tokyo Inn",
            "Tokyo",
            "Japan",
            (35.6762, 139.6503),
            "Modern eco hotel",
            4,
            &["led lighting", "recycling"],
        ),
        entry(
            "basic-singapore-1",
            "Earth Hotel Singapore",
            "Singapore",
            "Singapore",
            (1.3521, 103.8198),
            "Award-winning green building",
            5,
            &["solar", "ev charging", "organic"],
        ),
        entry(
            "basic-dubai-1",
            "Desert Eco Suites",
            "Dubai",
            "United Arab Emirates",
            (25.2048, 55.2708),
            "Sustainable suites with water conservation",
            4,
            &["water conservation", "energy"],
        ),
    ]
}

fn maps_link(subject: &str) -> String {
    format!("https://www.google.com/maps/search/{}", encode_component(subject))
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Read-only set of catalog entries, built once at startup.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<Candidate>,
}

impl StaticCatalog {
    pub fn build() -> Self {
        let mut entries = Vec::with_capacity(US_CITIES.len() * VARIANTS.len() + 5);
        for us in US_CITIES {
            let slug = slugify(us.city);
            for (n, variant) in VARIANTS.iter().enumerate() {
                let name = format!("{} {}", us.city, variant.suffix);
                entries.push(Candidate {
                    id: format!("basic-us-{}-{}", slug, n + 1),
                    website: maps_link(&name),
                    name,
                    city: us.city.to_string(),
                    country: "USA".to_string(),
                    lat: us.lat + variant.lat_offset,
                    lon: us.lon + variant.lon_offset,
                    description: format!("Sustainable stay in {}, {}", us.city, us.state),
                    stars: variant.stars,
                    amenities: variant.amenities.iter().map(|a| a.to_string()).collect(),
                    leed: true,
                });
            }
        }
        entries.extend(international());

        tracing::debug!(entries = entries.len(), "static catalog built");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    /// Entries whose city and country contain the given needles.
    ///
    /// Only the text before the first comma of `city` is used, so
    /// "Austin, TX" matches the Austin entries. Empty needles match all.
    pub fn filter(&self, city: &str, country: &str) -> Vec<Candidate> {
        let city_needle = city.split(',').next().unwrap_or("").trim().to_lowercase();
        let country = country.trim();
        let country_needle = country_alias(country).unwrap_or(country).to_lowercase();

        self.entries
            .iter()
            .filter(|e| city_needle.is_empty() || e.city.to_lowercase().contains(&city_needle))
            .filter(|e| country_needle.is_empty() || e.country.to_lowercase().contains(&country_needle))
            .cloned()
            .collect()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::build()
    }
}
