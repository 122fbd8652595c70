//! Debounced keyword search

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::debounce::Debouncer;
use super::state::{self, SearchState, SearchStatus};
use crate::domain::{PlaceResult, Prefecture};
use crate::places::PlacesSearch;
use crate::policy::FailurePolicy;

/// Keyword search that waits for typing to settle before querying
///
/// Every keyword or prefecture change restarts the quiet period. A blank
/// keyword clears results at once and issues no request.
pub struct KeywordSearch {
    client: Arc<dyn PlacesSearch>,
    debouncer: Debouncer,
    tx: Arc<watch::Sender<SearchStatus>>,
    keyword: String,
    prefecture: Option<Prefecture>,
}

impl KeywordSearch {
    pub fn new(client: Arc<dyn PlacesSearch>, debounce: Duration) -> Self {
        debug!(?debounce, "KeywordSearch::new: called");
        let (tx, _) = watch::channel(SearchStatus::default());
        Self {
            client,
            debouncer: Debouncer::new(debounce),
            tx: Arc::new(tx),
            keyword: String::new(),
            prefecture: None,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if keyword == self.keyword {
            return;
        }
        self.keyword = keyword;
        self.rerun();
    }

    /// Scope searches to a prefecture, or search nationwide with `None`
    pub fn set_prefecture(&mut self, prefecture: Option<Prefecture>) {
        if prefecture == self.prefecture {
            return;
        }
        self.prefecture = prefecture;
        self.rerun();
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

    /// Whether a search is waiting on the timer or in flight
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn rerun(&mut self) {
        self.debouncer.cancel();

        if self.keyword.trim().is_empty() {
            debug!("KeywordSearch: keyword cleared");
            state::reset(&self.tx, SearchState::Empty);
            return;
        }

        // Results from the previous keyword stay visible until the timer fires
        let generation = state::next_generation(&self.tx);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let keyword = self.keyword.trim().to_string();
        let prefecture = self.prefecture;
        debug!(%keyword, generation, "KeywordSearch: scheduling search");

        self.debouncer.call(async move {
            if !state::publish(&tx, generation, SearchState::Loading) {
                return;
            }
            let result = client.search_by_keyword(&keyword, prefecture.as_ref()).await;
            let results = FailurePolicy::or_default("keyword search", result);
            if !state::publish_results(&tx, generation, results) {
                debug!(%keyword, generation, "KeywordSearch: discarding stale results");
            }
        });
    }
}
