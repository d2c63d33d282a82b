//! Name enrichment for POIs that arrive without a `name` tag.
//!
//! Each enrichment costs one reverse lookup, so at most
//! [`MAX_ENRICHED`] records are looked up per request. Everything else
//! gets a synthetic name derived from its id and position.

use std::time::Duration;

use super::merge::AbandonSignal;
use super::types::{Candidate, PendingCandidate};
use crate::location::types::ReversePlace;
use crate::location::PlaceLookup;

/// Reverse lookups allowed per request. Above this many nameless
/// records the pipeline skips enrichment altogether.
pub const MAX_ENRICHED: usize = 20;

/// Deterministic `"<city> Hotel #<n>"` with `n` in 1000..=9999.
pub fn synthetic_name(pending: &PendingCandidate) -> String {
    let mut h = 0xcbf2_9ce4_8422_2325_u64;
    for byte in pending.id.bytes() {
        h = (h ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3);
    }
    h = splitmix(h ^ pending.at.lat.to_bits());
    h = splitmix(h ^ pending.at.lon.to_bits());
    let n = 1000 + h % 9000;

    let city = pending.location.city.trim();
    if city.is_empty() {
        format!("Hotel #{}", n)
    } else {
        format!("{} Hotel #{}", city, n)
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// First populated field in preference order:
/// hotel, accommodation, building, shop, then the POI name.
pub fn preferred_name(place: &ReversePlace) -> Option<String> {
    let address = place.address.as_ref();
    [
        address.and_then(|a| a.hotel.as_deref()),
        address.and_then(|a| a.accommodation.as_deref()),
        address.and_then(|a| a.building.as_deref()),
        address.and_then(|a| a.shop.as_deref()),
        place.name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|n| !n.is_empty())
    .map(str::to_string)
}

pub fn count_unnamed(pending: &[PendingCandidate]) -> usize {
    pending.iter().filter(|p| !p.is_named()).count()
}

/// Name every record synthetically where it lacks a name.
pub fn assign_synthetic_names(pending: Vec<PendingCandidate>) -> Vec<Candidate> {
    pending
        .into_iter()
        .map(|p| p.into_candidate(synthetic_name))
        .collect()
}

/// Reverse-geocode up to [`MAX_ENRICHED`] nameless records, then sweep
/// the rest with synthetic names.
///
/// Stops looking up as soon as `signal` is raised; whatever is still
/// nameless then goes straight to the synthetic sweep.
pub fn enrich_names(
    lookup: &dyn PlaceLookup,
    mut pending: Vec<PendingCandidate>,
    timeout: Duration,
    signal: &AbandonSignal,
) -> Vec<Candidate> {
    let mut enriched = 0usize;
    for record in pending.iter_mut().filter(|p| !p.is_named()).take(MAX_ENRICHED) {
        if signal.is_abandoned() {
            tracing::debug!(enriched, "enrichment abandoned");
            break;
        }
        match lookup.reverse(record.at, timeout) {
            Ok(place) => {
                record.name = preferred_name(&place);
                if record.name.is_some() {
                    enriched += 1;
                }
            }
            Err(e) => {
                tracing::warn!(id = %record.id, at = %record.at, error = %e, "reverse lookup failed");
            }
        }
    }
    tracing::debug!(enriched, total = pending.len(), "name enrichment done");

    assign_synthetic_names(pending)
}
