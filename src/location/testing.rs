//! In-process geocoder fake for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::nominatim::PlaceLookup;
use super::types::{Coordinate, LocationError, Place, ReversePlace, SearchParams};

#[derive(Default)]
pub struct FakeLookup {
    searches: HashMap<String, Value>,
    reverses: Vec<(Coordinate, Value)>,
    fail_search: bool,
    fail_reverse: bool,
    delay: Option<Duration>,
    search_log: Mutex<Vec<String>>,
    reverse_log: Mutex<Vec<Coordinate>>,
}

impl FakeLookup {
    /// Respond to an exact query string with a JSON array of places.
    pub fn with_search(mut self, query: &str, places: Value) -> Self {
        self.searches.insert(query.to_string(), places);
        self
    }

    /// Respond to a reverse lookup at `(lat, lon)` with a JSON object.
    pub fn with_reverse(mut self, lat: f64, lon: f64, place: Value) -> Self {
        let at = Coordinate::new(lat, lon).expect("valid test coordinate");
        self.reverses.push((at, place));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_search = true;
        self.fail_reverse = true;
        self
    }

    pub fn failing_reverse(mut self) -> Self {
        self.fail_reverse = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.search_log.lock().unwrap().clone()
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_log.lock().unwrap().len()
    }
}

impl PlaceLookup for FakeLookup {
    fn search(&self, query: &str, _params: SearchParams) -> Result<Vec<Place>, LocationError> {
        self.search_log.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail_search {
            return Err(LocationError::Network("connection refused".into()));
        }
        match self.searches.get(query) {
            Some(places) => serde_json::from_value(places.clone())
                .map_err(|e| LocationError::InvalidResponse(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn reverse(&self, at: Coordinate, _timeout: Duration) -> Result<ReversePlace, LocationError> {
        self.reverse_log.lock().unwrap().push(at);
        if self.fail_reverse {
            return Err(LocationError::Status { status: 503, url: "/reverse".into() });
        }
        let hit = self
            .reverses
            .iter()
            .find(|(c, _)| (c.lat - at.lat).abs() < 1e-9 && (c.lon - at.lon).abs() < 1e-9);
        match hit {
            Some((_, place)) => serde_json::from_value(place.clone())
                .map_err(|e| LocationError::InvalidResponse(e.to_string())),
            None => Ok(ReversePlace::default()),
        }
    }
}
