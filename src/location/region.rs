//! Country-vs-city disambiguation for single free-text destinations.
//!
//! "Thailand" and "Bangkok" arrive in the same field; only a geocoder
//! round-trip can tell a country from a city.

use std::time::Duration;

use super::nominatim::PlaceLookup;
use super::types::{Place, SearchParams};

/// Minimum importance for a top result to count as a country.
pub const COUNTRY_IMPORTANCE_THRESHOLD: f64 = 0.5;

/// Representative city per country (lowercase key).
const MAJOR_CITIES: &[(&str, &str)] = &[
    // Asia
    ("thailand", "Bangkok"),
    ("vietnam", "Ho Chi Minh City"),
    ("viet nam", "Ho Chi Minh City"),
    ("cambodia", "Phnom Penh"),
    ("laos", "Vientiane"),
    ("philippines", "Manila"),
    ("indonesia", "Jakarta"),
    ("malaysia", "Kuala Lumpur"),
    ("singapore", "Singapore"),
    ("japan", "Tokyo"),
    ("south korea", "Seoul"),
    ("korea", "Seoul"),
    ("china", "Beijing"),
    ("india", "Delhi"),
    ("bangladesh", "Dhaka"),
    ("pakistan", "Islamabad"),
    ("sri lanka", "Colombo"),
    ("nepal", "Kathmandu"),
    ("myanmar", "Yangon"),
    ("burma", "Yangon"),
    ("mongolia", "Ulaanbaatar"),
    ("taiwan", "Taipei"),
    ("hong kong", "Hong Kong"),
    // Europe
    ("italy", "Rome"),
    ("france", "Paris"),
    ("spain", "Barcelona"),
    ("germany", "Berlin"),
    ("united kingdom", "London"),
    ("portugal", "Lisbon"),
    ("greece", "Athens"),
    ("switzerland", "Zurich"),
    ("austria", "Vienna"),
    ("netherlands", "Amsterdam"),
    ("belgium", "Brussels"),
    ("czech republic", "Prague"),
    ("czechia", "Prague"),
    ("poland", "Warsaw"),
    ("sweden", "Stockholm"),
    ("norway", "Oslo"),
    ("denmark", "Copenhagen"),
    ("finland", "Helsinki"),
    ("ireland", "Dublin"),
    ("hungary", "Budapest"),
    ("croatia", "Dubrovnik"),
    ("iceland", "Reykjavik"),
    ("slovenia", "Ljubljana"),
    ("romania", "Bucharest"),
    // North America
    ("united states", "New York"),
    ("usa", "New York"),
    ("canada", "Toronto"),
    ("mexico", "Mexico City"),
    // Middle East
    ("united arab emirates", "Dubai"),
    ("uae", "Dubai"),
    ("saudi arabia", "Riyadh"),
    ("qatar", "Doha"),
    ("oman", "Muscat"),
    ("jordan", "Amman"),
    ("lebanon", "Beirut"),
    ("israel", "Tel Aviv"),
    ("turkey", "Istanbul"),
    // Africa
    ("egypt", "Cairo"),
    ("morocco", "Marrakech"),
    ("kenya", "Nairobi"),
    ("south africa", "Cape Town"),
    ("nigeria", "Lagos"),
    ("tanzania", "Dar es Salaam"),
    // Oceania
    ("australia", "Sydney"),
    ("new zealand", "Auckland"),
    // South America
    ("argentina", "Buenos Aires"),
    ("brazil", "São Paulo"),
    ("chile", "Santiago"),
    ("colombia", "Bogotá"),
    ("ecuador", "Quito"),
    ("peru", "Lima"),
    ("venezuela", "Caracas"),
    ("bolivia", "La Paz"),
    ("paraguay", "Asunción"),
    ("uruguay", "Montevideo"),
    ("guyana", "Georgetown"),
    ("suriname", "Paramaribo"),
    // Central America
    ("costa rica", "San José"),
    ("panama", "Panama City"),
    ("honduras", "Tegucigalpa"),
    ("guatemala", "Guatemala City"),
    ("el salvador", "San Salvador"),
    ("nicaragua", "Managua"),
    ("belize", "Belize City"),
];

/// Representative city for a country, or the country itself when unmapped.
pub fn major_city_for(country: &str) -> String {
    let key = country.trim().to_lowercase();
    MAJOR_CITIES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, city)| city.to_string())
        .unwrap_or_else(|| country.trim().to_string())
}

/// Whether a geocoder result looks like a country-level boundary.
pub fn looks_like_country(place: &Place) -> bool {
    let is_admin = place.place_type.as_deref() == Some("administrative");
    let class_ok = matches!(place.place_class.as_deref(), Some("boundary") | Some("place"));
    let important = place.importance.unwrap_or(0.0) > COUNTRY_IMPORTANCE_THRESHOLD;
    is_admin && class_ok && important
}

/// Geocoder-backed classification of free-text destinations.
pub struct RegionClassifier<'a> {
    lookup: &'a dyn PlaceLookup,
    timeout: Duration,
}

impl<'a> RegionClassifier<'a> {
    pub fn new(lookup: &'a dyn PlaceLookup, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    /// True when the top result is a major administrative boundary.
    /// Any lookup failure classifies as "not a country".
    pub fn is_country(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.lookup.search(name, SearchParams::top(self.timeout)) {
            Ok(places) => places.first().is_some_and(looks_like_country),
            Err(e) => {
                tracing::warn!(name, error = %e, "country classification failed");
                false
            }
        }
    }

    /// Country named in the address of the city's top result, if any.
    pub fn country_from_city(&self, city: &str) -> Option<String> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        let params = SearchParams::top(self.timeout).with_address();
        match self.lookup.search(city, params) {
            Ok(places) => places.first().and_then(Place::country).map(str::to_string),
            Err(e) => {
                tracing::warn!(city, error = %e, "country detection failed");
                None
            }
        }
    }
}
