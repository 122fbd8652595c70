//! Popular-spot search for the selected prefecture

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::debounce::ScheduledTask;
use super::state::{self, SearchState, SearchStatus};
use crate::domain::{PlaceResult, Prefecture};
use crate::places::PlacesSearch;
use crate::policy::FailurePolicy;

/// Fetches popular spots whenever the prefecture changes
///
/// No debounce: a new prefecture fires a request immediately. Clearing the
/// prefecture clears the results and cancels any request in flight.
pub struct AreaSearch {
    client: Arc<dyn PlacesSearch>,
    tx: Arc<watch::Sender<SearchStatus>>,
    prefecture: Option<Prefecture>,
    pending: Option<ScheduledTask>,
}

impl AreaSearch {
    pub fn new(client: Arc<dyn PlacesSearch>) -> Self {
        debug!("AreaSearch::new: called");
        let (tx, _) = watch::channel(SearchStatus::default());
        Self {
            client,
            tx: Arc::new(tx),
            prefecture: None,
            pending: None,
        }
    }

    pub fn prefecture(&self) -> Option<Prefecture> {
        self.prefecture
    }

    pub fn set_prefecture(&mut self, prefecture: Option<Prefecture>) {
        if prefecture == self.prefecture {
            return;
        }
        self.prefecture = prefecture;

        if let Some(task) = self.pending.take() {
            task.cancel();
        }

        let Some(prefecture) = prefecture else {
            debug!("AreaSearch: prefecture cleared");
            state::reset(&self.tx, SearchState::Empty);
            return;
        };

        let generation = state::reset(&self.tx, SearchState::Loading);
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(%prefecture, generation, "AreaSearch: fetching popular spots");

        self.pending = Some(ScheduledTask::spawn(async move {
            let result = client.search_popular_by_area(&prefecture).await;
            let results = FailurePolicy::or_default("area search", result);
            if !state::publish_results(&tx, generation, results) {
                debug!(%prefecture, generation, "AreaSearch: discarding stale results");
            }
        }));
    }

    pub fn state(&self) -> SearchState {
        self.tx.borrow().state.clone()
    }

    pub fn results(&self) -> Vec<PlaceResult> {
        self.tx.borrow().state.results().to_vec()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.tx.subscribe()
    }

    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_finished())
    }
}
