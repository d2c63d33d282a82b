//! Nominatim (OpenStreetMap) client: forward search and reverse lookup.

use std::time::Duration;

use super::types::{Coordinate, LocationError, Place, ReversePlace, SearchParams};

/// Forward and reverse geocoding, as the pipeline needs them.
///
/// Implemented by [`NominatimClient`]; tests substitute in-process fakes.
pub trait PlaceLookup: Send + Sync {
    fn search(&self, query: &str, params: SearchParams) -> Result<Vec<Place>, LocationError>;

    fn reverse(&self, at: Coordinate, timeout: Duration) -> Result<ReversePlace, LocationError>;
}

/// Blocking Nominatim client sharing one connection pool.
#[derive(Clone)]
pub struct NominatimClient {
    agent: ureq::Agent,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(user_agent).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl PlaceLookup for NominatimClient {
    fn search(&self, query: &str, params: SearchParams) -> Result<Vec<Place>, LocationError> {
        let url = format!("{}/search", self.base_url);
        let mut request = self
            .agent
            .get(&url)
            .timeout(params.timeout)
            .query("q", query)
            .query("format", "json")
            .query("limit", &params.limit.to_string());
        if params.address_details {
            request = request.query("addressdetails", "1");
        }
        if params.extra_tags {
            request = request.query("extratags", "1");
        }

        let places: Vec<Place> = request
            .call()?
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        tracing::debug!(query, results = places.len(), "nominatim search");
        Ok(places)
    }

    fn reverse(&self, at: Coordinate, timeout: Duration) -> Result<ReversePlace, LocationError> {
        let url = format!("{}/reverse", self.base_url);
        self.agent
            .get(&url)
            .timeout(timeout)
            .query("format", "json")
            .query("lat", &at.lat.to_string())
            .query("lon", &at.lon.to_string())
            .query("zoom", "18")
            .query("addressdetails", "1")
            .call()?
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))
    }
}
