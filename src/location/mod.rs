//! Location subsystem for stayfinder.
//!
//! Turns a raw destination into a normalized city/country pair and a
//! coordinate: alias resolution, country detection, and geocoding.

pub mod geocoder;
pub mod nominatim;
pub mod normalize;
pub mod region;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use geocoder::geocode;
pub use nominatim::{NominatimClient, PlaceLookup};
pub use normalize::{country_alias, normalize, normalize_parts};
pub use region::{major_city_for, RegionClassifier};
pub use types::{Coordinate, LocationError, LocationQuery, NormalizedLocation};
