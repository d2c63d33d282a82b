//! The live search as an explicit state machine.
//!
//! ```text
//! Init → Classified → Geocoded → Queried → Enriched ─┐
//!                 │                    └→ Fallback ──┤
//!                 └──── (unresolved) ────────────────┴→ Done
//! ```
//!
//! Each stage owns the data the next one needs. The abandonment signal
//! is checked before every transition, and inside the enrichment and
//! fallback stages before each outbound call, so a request past its
//! deadline stops issuing calls after the one in flight.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinError;

use super::catalog::StaticCatalog;
use super::enrich::{assign_synthetic_names, count_unnamed, enrich_names, MAX_ENRICHED};
use super::fallback::fallback_search;
use super::merge::{merge, race_live, AbandonSignal};
use super::overpass::{query_lodging, OverpassClient, PoiSource};
use super::types::{Candidate, PendingCandidate, ResultSet};
use crate::config::SearchConfig;
use crate::location::{
    geocode, major_city_for, normalize, Coordinate, LocationQuery, NominatimClient,
    NormalizedLocation, PlaceLookup, RegionClassifier,
};

#[derive(Debug)]
enum Stage {
    Init(LocationQuery),
    Classified(NormalizedLocation),
    Geocoded(NormalizedLocation, Coordinate),
    Queried(NormalizedLocation, Vec<PendingCandidate>),
    Enriched(Vec<Candidate>),
    Fallback(NormalizedLocation),
    Done(Vec<Candidate>),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Init(_) => "init",
            Stage::Classified(_) => "classified",
            Stage::Geocoded(..) => "geocoded",
            Stage::Queried(..) => "queried",
            Stage::Enriched(_) => "enriched",
            Stage::Fallback(_) => "fallback",
            Stage::Done(_) => "done",
        }
    }
}

/// Live lodging search over a geocoder and a POI source.
pub struct SearchPipeline {
    lookup: Arc<dyn PlaceLookup>,
    poi: Arc<dyn PoiSource>,
    config: SearchConfig,
}

impl SearchPipeline {
    pub fn new(lookup: Arc<dyn PlaceLookup>, poi: Arc<dyn PoiSource>, config: SearchConfig) -> Self {
        Self { lookup, poi, config }
    }

    /// Pipeline backed by the public Nominatim and Overpass services.
    pub fn from_config(config: SearchConfig) -> Self {
        let lookup = NominatimClient::new(&config.nominatim_url, &config.user_agent);
        let poi = OverpassClient::new(&config.overpass_url, &config.user_agent, config.overpass_timeout);
        Self::new(Arc::new(lookup), Arc::new(poi), config)
    }

    /// Drive the stages to completion. Blocking.
    ///
    /// Returns an empty list when abandoned mid-way.
    pub fn run(&self, query: &LocationQuery, signal: &AbandonSignal) -> Vec<Candidate> {
        let mut stage = Stage::Init(query.clone());
        loop {
            stage = match stage {
                Stage::Done(found) => return finish(found),
                ref pending if signal.is_abandoned() => {
                    tracing::debug!(stage = pending.name(), "pipeline abandoned");
                    return Vec::new();
                }
                Stage::Init(query) => self.classify(&query),
                Stage::Classified(location) => self.locate(location),
                Stage::Geocoded(location, at) => self.query(location, at),
                Stage::Queried(location, pending) => self.enrich(&location, pending, signal),
                Stage::Enriched(found) => Stage::Done(found),
                Stage::Fallback(location) => self.fallback(&location, signal),
            };
        }
    }

    /// Race [`run`](Self::run) against the request deadline and merge
    /// with the catalog.
    pub async fn search(
        self: Arc<Self>,
        catalog: &StaticCatalog,
        query: LocationQuery,
    ) -> Result<ResultSet, JoinError> {
        let location = normalize(&query);
        let deadline = self.config.request_deadline;
        let pipeline = Arc::clone(&self);
        let live = race_live(deadline, move |signal| pipeline.run(&query, &signal))
            .await?
            .into_candidates();

        let set = merge(live, catalog.filter(&location.city, &location.country));
        tracing::info!(location = %location, results = set.candidates.len(), source = %set.source, "hotel search");
        Ok(set)
    }

    // ─── Transitions ────────────────────────────────────────────

    fn classify(&self, query: &LocationQuery) -> Stage {
        let mut location = normalize(query);
        if location.country.is_empty() {
            let classifier = RegionClassifier::new(self.lookup.as_ref(), self.config.classify_timeout);
            let raw = query.raw_city.trim();
            if classifier.is_country(raw) {
                location.country = raw.to_string();
                location.city = major_city_for(raw);
                tracing::debug!(country = raw, city = %location.city, "destination is a country");
            } else if let Some(country) = classifier.country_from_city(&location.city) {
                location.country = country;
            }
        }
        tracing::debug!(location = %location, "classified");
        Stage::Classified(location)
    }

    fn locate(&self, location: NormalizedLocation) -> Stage {
        match geocode(self.lookup.as_ref(), &location, self.config.geocode_timeout) {
            Some(at) => Stage::Geocoded(location, at),
            None => Stage::Done(Vec::new()),
        }
    }

    fn query(&self, location: NormalizedLocation, at: Coordinate) -> Stage {
        let pending = query_lodging(self.poi.as_ref(), at, &location);
        tracing::debug!(location = %location, at = %at, found = pending.len(), "lodging query");
        if pending.is_empty() {
            Stage::Fallback(location)
        } else {
            Stage::Queried(location, pending)
        }
    }

    fn enrich(
        &self,
        location: &NormalizedLocation,
        pending: Vec<PendingCandidate>,
        signal: &AbandonSignal,
    ) -> Stage {
        let unnamed = count_unnamed(&pending);
        if unnamed > MAX_ENRICHED {
            tracing::debug!(location = %location, unnamed, "too many unnamed, skipping enrichment");
            return Stage::Enriched(assign_synthetic_names(pending));
        }
        Stage::Enriched(enrich_names(self.lookup.as_ref(), pending, self.config.reverse_timeout, signal))
    }

    fn fallback(&self, location: &NormalizedLocation, signal: &AbandonSignal) -> Stage {
        Stage::Done(fallback_search(self.lookup.as_ref(), self.poi.as_ref(), location, &self.config, signal))
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn finish(found: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let unique: Vec<Candidate> = found.into_iter().filter(|c| seen.insert(c.id.clone())).collect();
    let sustainable = unique.iter().filter(|c| c.mentions_sustainability()).count();
    tracing::debug!(results = unique.len(), sustainable, "live search done");
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::testing::FakeLookup;
    use crate::lodging::overpass::QueryKind;
    use crate::lodging::testing::FakePoi;
    use crate::lodging::types::SourceLabel;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn pipeline(lookup: FakeLookup, poi: FakePoi) -> (Arc<FakeLookup>, Arc<FakePoi>, SearchPipeline) {
        let lookup = Arc::new(lookup);
        let poi = Arc::new(poi);
        let p = SearchPipeline::new(lookup.clone(), poi.clone(), SearchConfig::default());
        (lookup, poi, p)
    }

    fn nodes(n: u64, named: bool) -> Value {
        let elements: Vec<_> = (0..n)
            .map(|i| {
                let tags = if named { json!({ "name": format!("Hotel {}", i) }) } else { json!({}) };
                json!({ "type": "node", "id": i, "lat": 41.9 + i as f64 * 0.001, "lon": 12.5, "tags": tags })
            })
            .collect();
        json!(elements)
    }

    fn rome_lookup() -> FakeLookup {
        FakeLookup::default().with_search("Rome,Italy", json!([{ "lat": "41.9", "lon": "12.5" }]))
    }

    #[test]
    fn test_country_destination_uses_major_city() {
        let lookup = FakeLookup::default()
            .with_search(
                "Thailand",
                json!([{ "lat": "15.0", "lon": "101.0", "type": "administrative", "class": "boundary", "importance": 0.82 }]),
            )
            .with_search("Bangkok,Thailand", json!([{ "lat": "13.75", "lon": "100.5" }]));
        let (lookup, _, p) = pipeline(lookup, FakePoi::default().with_lodging(nodes(2, true)));

        let out = p.run(&LocationQuery::new("Thailand", ""), &AbandonSignal::new());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.city == "Bangkok" && c.country == "Thailand"));
        assert_eq!(lookup.searched(), vec!["Thailand".to_string(), "Bangkok,Thailand".to_string()]);
    }

    #[test]
    fn test_country_inferred_from_city() {
        let lookup = FakeLookup::default()
            .with_search("Florence", json!([{ "lat": "43.77", "lon": "11.25", "type": "city", "class": "place", "address": { "country": "Italia" } }]))
            .with_search("Florence,Italia", json!([{ "lat": "43.77", "lon": "11.25" }]));
        let (_, _, p) = pipeline(lookup, FakePoi::default().with_lodging(nodes(1, true)));

        let out = p.run(&LocationQuery::new("Florence", ""), &AbandonSignal::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].country, "Italia");
    }

    #[test]
    fn test_unresolved_location_is_empty() {
        let (_, poi, p) = pipeline(FakeLookup::default(), FakePoi::default().with_lodging(nodes(3, true)));
        let out = p.run(&LocationQuery::new("Xyzzy", "Nowhere"), &AbandonSignal::new());
        assert!(out.is_empty());
        assert!(poi.queries().is_empty());
    }

    #[test]
    fn test_nameless_results_are_enriched() {
        let (lookup, _, p) = pipeline(rome_lookup(), FakePoi::default().with_lodging(nodes(5, false)));
        let out = p.run(&LocationQuery::new("Rome", "Italy"), &AbandonSignal::new());
        assert_eq!(out.len(), 5);
        assert_eq!(lookup.reverse_calls(), 5);
        assert!(out.iter().all(|c| c.name.starts_with("Rome Hotel #")));
    }

    #[test]
    fn test_many_nameless_skip_enrichment() {
        let (lookup, _, p) = pipeline(rome_lookup(), FakePoi::default().with_lodging(nodes(21, false)));
        let out = p.run(&LocationQuery::new("Rome", "Italy"), &AbandonSignal::new());
        assert_eq!(out.len(), 21);
        assert_eq!(lookup.reverse_calls(), 0);
        assert!(out.iter().all(|c| !c.name.is_empty()));
    }

    #[test]
    fn test_empty_query_falls_back() {
        let poi = FakePoi::default().with_named(nodes(3, true));
        let (_, poi, p) = pipeline(rome_lookup(), poi);
        let out = p.run(&LocationQuery::new("Rome", "Italy"), &AbandonSignal::new());
        assert_eq!(out.len(), 3);
        assert_eq!(poi.queries(), vec![QueryKind::Lodging, QueryKind::NamedLodging]);
    }

    #[test]
    fn test_duplicate_ids_removed() {
        let dupes = json!([
            { "type": "node", "id": 1, "lat": 41.9, "lon": 12.5, "tags": { "name": "A" } },
            { "type": "node", "id": 1, "lat": 41.9, "lon": 12.5, "tags": { "name": "A again" } },
            { "type": "way", "id": 1, "center": { "lat": 41.9, "lon": 12.5 }, "tags": { "name": "B" } }
        ]);
        let (_, _, p) = pipeline(rome_lookup(), FakePoi::default().with_lodging(dupes));
        let ids: Vec<_> = p
            .run(&LocationQuery::new("Rome", "Italy"), &AbandonSignal::new())
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["osm-node-1", "osm-way-1"]);
    }

    #[test]
    fn test_deterministic_results() {
        let run = || {
            let (_, _, p) = pipeline(rome_lookup(), FakePoi::default().with_lodging(nodes(4, false)));
            p.run(&LocationQuery::new("Rome", "Italy"), &AbandonSignal::new())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_abandoned_before_start() {
        let signal = AbandonSignal::new();
        signal.abandon();
        let (lookup, _, p) = pipeline(rome_lookup(), FakePoi::default().with_lodging(nodes(2, true)));
        assert!(p.run(&LocationQuery::new("Rome", "Italy"), &signal).is_empty());
        assert!(lookup.searched().is_empty());
    }

    #[test]
    fn test_abandoned_during_query_skips_fallback() {
        let signal = AbandonSignal::new();
        let poi = FakePoi::default().abandoning(signal.clone());
        let (lookup, poi, p) = pipeline(rome_lookup(), poi);

        assert!(p.run(&LocationQuery::new("Rome", "Italy"), &signal).is_empty());
        assert_eq!(lookup.searched(), vec!["Rome,Italy".to_string()]);
        assert_eq!(poi.queries(), vec![QueryKind::Lodging]);
    }

    #[tokio::test]
    async fn test_slow_lodging_query_hits_deadline() {
        let lookup = Arc::new(
            FakeLookup::default().with_search("Paris,France", json!([{ "lat": "48.85", "lon": "2.35" }])),
        );
        let poi = Arc::new(
            FakePoi::default()
                .with_lodging(nodes(3, false))
                .with_delay(Duration::from_millis(400)),
        );
        let config = SearchConfig {
            request_deadline: Duration::from_millis(100),
            ..SearchConfig::default()
        };
        let p = Arc::new(SearchPipeline::new(lookup.clone(), poi.clone(), config));

        let set = p.search(&StaticCatalog::build(), LocationQuery::new("Paris", "France")).await.unwrap();
        assert_eq!(set.source, SourceLabel::StaticOnly);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(poi.queries(), vec![QueryKind::Lodging]);
        assert_eq!(lookup.reverse_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_merges_with_catalog() {
        let lookup = FakeLookup::default().with_search("Paris,France", json!([{ "lat": "48.85", "lon": "2.35" }]));
        let (_, _, p) = pipeline(lookup, FakePoi::default().with_lodging(nodes(3, true)));
        let p = Arc::new(p);

        let set = p.search(&StaticCatalog::build(), LocationQuery::new("Paris", "France")).await.unwrap();
        assert_eq!(set.source, SourceLabel::LiveAndStatic);
        assert_eq!(set.candidates.len(), 4);
        assert_eq!(set.candidates[3].id, "basic-paris-1");
    }

    #[tokio::test]
    async fn test_search_deadline_serves_catalog() {
        let lookup = FakeLookup::default()
            .with_search("Paris,France", json!([{ "lat": "48.85", "lon": "2.35" }]))
            .with_delay(Duration::from_millis(500));
        let poi = Arc::new(FakePoi::default());
        let config = SearchConfig {
            request_deadline: Duration::from_millis(100),
            ..SearchConfig::default()
        };
        let p = Arc::new(SearchPipeline::new(Arc::new(lookup), poi.clone(), config));

        let set = p.search(&StaticCatalog::build(), LocationQuery::new("Paris", "France")).await.unwrap();
        assert_eq!(set.source, SourceLabel::StaticOnly);
        assert_eq!(set.candidates.len(), 1);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(poi.queries().is_empty());
    }
}
