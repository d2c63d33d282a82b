//! Second-chance searches when the primary POI query finds nothing.
//!
//! Strategy 1 widens the box and keeps only named hotels. Strategy 2
//! skips POIs entirely and asks the geocoder for "hotel <city>".

use super::merge::AbandonSignal;
use super::overpass::{PoiQuery, PoiSource};
use super::types::{live_amenities, website_or_link, Candidate, DEFAULT_STARS};
use crate::config::SearchConfig;
use crate::location::types::{Place, SearchParams};
use crate::location::{geocode, NormalizedLocation, PlaceLookup};

/// Cap on named elements kept from the widened POI query.
pub const MAX_NAMED_POI_RESULTS: usize = 50;

/// Cap on places kept from the free-text search.
pub const MAX_TEXT_RESULTS: usize = 100;

const LODGING_TYPES: &[&str] = &["hotel", "guest_house", "hostel", "alpine_hut", "apartment", "motel"];

const NAME_KEYWORDS: &[&str] = &["hotel", "resort", "inn", "hostel"];

/// Run strategy 1, then strategy 2 if that came back empty.
///
/// `signal` is checked before every outbound call; once raised, the
/// search returns what it has without calling out again.
pub fn fallback_search(
    lookup: &dyn PlaceLookup,
    poi: &dyn PoiSource,
    location: &NormalizedLocation,
    config: &SearchConfig,
    signal: &AbandonSignal,
) -> Vec<Candidate> {
    let named = named_poi_search(lookup, poi, location, config, signal);
    if !named.is_empty() {
        tracing::debug!(location = %location, count = named.len(), "fallback: widened POI query");
        return named;
    }
    if signal.is_abandoned() {
        tracing::debug!(location = %location, "fallback abandoned before text search");
        return Vec::new();
    }

    let found = text_search(lookup, location, config);
    tracing::debug!(location = %location, count = found.len(), "fallback: free-text search");
    found
}

/// Re-geocode and query a 1° box for named hotels, guest houses and hostels.
pub fn named_poi_search(
    lookup: &dyn PlaceLookup,
    poi: &dyn PoiSource,
    location: &NormalizedLocation,
    config: &SearchConfig,
    signal: &AbandonSignal,
) -> Vec<Candidate> {
    if signal.is_abandoned() {
        return Vec::new();
    }
    let Some(at) = geocode(lookup, location, config.geocode_timeout) else {
        return Vec::new();
    };
    if signal.is_abandoned() {
        tracing::debug!(location = %location, "fallback abandoned before named query");
        return Vec::new();
    }

    match poi.query(&PoiQuery::named_lodging(at)) {
        Ok(elements) => elements
            .iter()
            .filter_map(|e| e.to_named(location))
            .take(MAX_NAMED_POI_RESULTS)
            .collect(),
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "named lodging query failed");
            Vec::new()
        }
    }
}

/// Free-text geocoder search for `"hotel <city>[, <country>]"`.
pub fn text_search(
    lookup: &dyn PlaceLookup,
    location: &NormalizedLocation,
    config: &SearchConfig,
) -> Vec<Candidate> {
    let query = format!("hotel {}", location.display_text());
    let params = SearchParams::top(config.text_search_timeout)
        .with_limit(MAX_TEXT_RESULTS)
        .with_address()
        .with_extra_tags();

    let places = match lookup.search(&query, params) {
        Ok(places) => places,
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "hotel text search failed");
            return Vec::new();
        }
    };

    places
        .iter()
        .enumerate()
        .filter_map(|(idx, place)| place_to_candidate(idx, place, location))
        .take(MAX_TEXT_RESULTS)
        .collect()
}

fn is_lodging_place(place: &Place, name: &str) -> bool {
    if name.chars().count() < 3 || name.eq_ignore_ascii_case("hotel") {
        return false;
    }
    let typed = place
        .place_type
        .as_deref()
        .is_some_and(|t| LODGING_TYPES.contains(&t));
    let lower = name.to_lowercase();
    typed || NAME_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn place_to_candidate(idx: usize, place: &Place, location: &NormalizedLocation) -> Option<Candidate> {
    let name = place.name.as_deref().map(str::trim)?;
    if !is_lodging_place(place, name) {
        return None;
    }
    let at = place.coordinate()?;

    let id = match (place.osm_type.as_deref(), place.osm_id) {
        (Some(kind), Some(id)) => format!("osm-{}-{}", kind, id),
        _ => format!("nominatim-{}", idx),
    };
    let description = place
        .address
        .as_ref()
        .and_then(|a| a.road.as_deref())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Hotel in {}", location.city));

    Some(Candidate {
        id,
        name: name.to_string(),
        city: location.city.clone(),
        country: location.country.clone(),
        lat: at.lat,
        lon: at.lon,
        description,
        stars: DEFAULT_STARS,
        amenities: live_amenities(),
        leed: true,
        website: website_or_link(place.website(), Some(name), at, location),
    })
}
