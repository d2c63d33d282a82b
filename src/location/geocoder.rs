//! Location → coordinate resolution.

use std::time::Duration;

use super::nominatim::PlaceLookup;
use super::types::{Coordinate, NormalizedLocation, SearchParams};

/// Resolve a location to the first result's coordinate.
///
/// Transport errors, error statuses, empty results and unusable
/// coordinates all collapse to `None`: the caller treats the location
/// as unresolved.
pub fn geocode(
    lookup: &dyn PlaceLookup,
    location: &NormalizedLocation,
    timeout: Duration,
) -> Option<Coordinate> {
    let text = location.search_text();
    if text.trim().is_empty() {
        return None;
    }

    let places = match lookup.search(&text, SearchParams::top(timeout)) {
        Ok(places) => places,
        Err(e) => {
            tracing::warn!(location = %text, error = %e, "geocoding failed");
            return None;
        }
    };

    let Some(first) = places.first() else {
        tracing::info!(location = %text, "location not found");
        return None;
    };

    let coord = first.coordinate();
    if coord.is_none() {
        tracing::warn!(location = %text, lat = %first.lat, lon = %first.lon, "unusable coordinate");
    }
    coord
}
