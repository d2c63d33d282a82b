//! Lodging search: POI queries, name enrichment, fallbacks, the static
//! catalog and the live/static merge.

pub mod catalog;
pub mod enrich;
pub mod fallback;
pub mod merge;
pub mod overpass;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::StaticCatalog;
pub use merge::{merge, AbandonSignal, LiveOutcome, MIN_LIVE_RESULTS};
pub use overpass::{OverpassClient, PoiError, PoiSource};
pub use pipeline::SearchPipeline;
pub use types::{Candidate, ResultSet, SourceLabel};
