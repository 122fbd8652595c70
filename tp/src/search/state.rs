//! Search unit state

use tokio::sync::watch;

use crate::domain::PlaceResult;

/// Where a search unit currently is
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// No query has been issued yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Results are available
    Loaded(Vec<PlaceResult>),
    /// Query cleared, nothing found, or the search failed
    Empty,
}

impl SearchState {
    /// Current results; empty unless Loaded
    pub fn results(&self) -> &[PlaceResult] {
        match self {
            Self::Loaded(results) => results,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn from_results(results: Vec<PlaceResult>) -> Self {
        if results.is_empty() { Self::Empty } else { Self::Loaded(results) }
    }
}

/// Value published on a search unit's watch channel
///
/// The generation ties a state to the input that produced it: a write
/// carrying an older generation than the current one is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatus {
    pub state: SearchState,
    generation: u64,
}

impl SearchStatus {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Start a new generation without notifying subscribers
///
/// Returns the new generation number.
pub(crate) fn next_generation(tx: &watch::Sender<SearchStatus>) -> u64 {
    let mut generation = 0;
    tx.send_if_modified(|status| {
        status.generation += 1;
        generation = status.generation;
        false
    });
    generation
}

/// Start a new generation and publish `state` with it
pub(crate) fn reset(tx: &watch::Sender<SearchStatus>, state: SearchState) -> u64 {
    let mut generation = 0;
    tx.send_modify(|status| {
        status.generation += 1;
        status.state = state;
        generation = status.generation;
    });
    generation
}

/// Publish `state` only if `generation` is still current
///
/// Returns false when a newer input superseded this one.
pub(crate) fn publish(tx: &watch::Sender<SearchStatus>, generation: u64, state: SearchState) -> bool {
    tx.send_if_modified(|status| {
        if status.generation != generation {
            return false;
        }
        status.state = state;
        true
    })
}

/// Publish the outcome of a finished search
pub(crate) fn publish_results(tx: &watch::Sender<SearchStatus>, generation: u64, results: Vec<PlaceResult>) -> bool {
    publish(tx, generation, SearchState::from_results(results))
}
