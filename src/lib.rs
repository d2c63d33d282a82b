//! Sustainability-themed hotel search over OpenStreetMap data.
//!
//! A request names a city (and optionally a country). The live pipeline
//! resolves it, queries lodging POIs around it, fills in missing names and
//! falls back to wider searches when needed; a built-in catalog tops up
//! thin results.

pub mod config;
pub mod location;
pub mod lodging;
pub mod server;
