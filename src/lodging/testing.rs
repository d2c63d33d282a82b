//! In-process POI source fake for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::merge::AbandonSignal;
use super::overpass::{PoiElement, PoiError, PoiQuery, PoiSource, QueryKind};

#[derive(Default)]
pub struct FakePoi {
    lodging: Option<Value>,
    named: Option<Value>,
    fail: bool,
    delay: Option<Duration>,
    raise: Option<AbandonSignal>,
    log: Mutex<Vec<QueryKind>>,
}

impl FakePoi {
    /// Elements returned for the primary lodging query.
    pub fn with_lodging(mut self, elements: Value) -> Self {
        self.lodging = Some(elements);
        self
    }

    /// Elements returned for the named-only fallback query.
    pub fn with_named(mut self, elements: Value) -> Self {
        self.named = Some(elements);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Raise `signal` as soon as any query arrives, as a deadline would.
    pub fn abandoning(mut self, signal: AbandonSignal) -> Self {
        self.raise = Some(signal);
        self
    }

    pub fn queries(&self) -> Vec<QueryKind> {
        self.log.lock().unwrap().clone()
    }
}

impl PoiSource for FakePoi {
    fn query(&self, query: &PoiQuery) -> Result<Vec<PoiElement>, PoiError> {
        self.log.lock().unwrap().push(query.kind);
        if let Some(signal) = &self.raise {
            signal.abandon();
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail {
            return Err(PoiError::Status { status: 504, url: "/api/interpreter".into() });
        }
        let elements = match query.kind {
            QueryKind::Lodging => self.lodging.as_ref(),
            QueryKind::NamedLodging => self.named.as_ref(),
        };
        match elements {
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| PoiError::InvalidResponse(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}
