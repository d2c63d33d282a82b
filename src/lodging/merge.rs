//! Deadline race for the live pipeline and the live/static merge.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;

use super::types::{Candidate, ResultSet, SourceLabel};

/// Below this many live results the catalog tops the list up.
pub const MIN_LIVE_RESULTS: usize = 10;

/// Shared flag telling a detached pipeline to stop before its next step.
#[derive(Debug, Clone, Default)]
pub struct AbandonSignal(Arc<AtomicBool>);

impl AbandonSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abandon(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_abandoned(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiveOutcome {
    Completed(Vec<Candidate>),
    TimedOut,
}

impl LiveOutcome {
    /// Live records, or nothing when the deadline won.
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Self::Completed(c) => c,
            Self::TimedOut => Vec::new(),
        }
    }
}

/// Run `job` on the blocking pool and wait at most `deadline` for it.
///
/// On expiry the signal is raised and the worker is left to finish on
/// its own; its result is dropped. A panicking worker surfaces as the
/// `JoinError`.
pub async fn race_live<F>(deadline: Duration, job: F) -> Result<LiveOutcome, JoinError>
where
    F: FnOnce(AbandonSignal) -> Vec<Candidate> + Send + 'static,
{
    let signal = AbandonSignal::new();
    let worker_signal = signal.clone();
    let handle = tokio::task::spawn_blocking(move || job(worker_signal));

    match tokio::time::timeout(deadline, handle).await {
        Ok(joined) => joined.map(LiveOutcome::Completed),
        Err(_) => {
            signal.abandon();
            tracing::info!(deadline_ms = deadline.as_millis() as u64, "live search abandoned at deadline");
            Ok(LiveOutcome::TimedOut)
        }
    }
}

/// Combine live results with the catalog tier.
///
/// Live records keep their order and come first; catalog entries are
/// appended only when their id is not already present.
pub fn merge(live: Vec<Candidate>, fallback: Vec<Candidate>) -> ResultSet {
    if live.is_empty() {
        return ResultSet {
            candidates: fallback,
            source: SourceLabel::StaticOnly,
        };
    }
    if live.len() >= MIN_LIVE_RESULTS {
        return ResultSet {
            candidates: live,
            source: SourceLabel::Live,
        };
    }

    let mut seen: HashSet<String> = live.iter().map(|c| c.id.clone()).collect();
    let mut candidates = live;
    for entry in fallback {
        if seen.insert(entry.id.clone()) {
            candidates.push(entry);
        }
    }
    ResultSet {
        candidates,
        source: SourceLabel::LiveAndStatic,
    }
}
