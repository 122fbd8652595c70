//! PlacesSearch trait definition

use async_trait::async_trait;

use super::PlacesError;
use crate::domain::{PlaceResult, Prefecture};

/// Point-of-interest search against an external maps provider
///
/// Both calls are remote and may fail; callers are expected to log the error
/// and carry on with an empty list.
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    /// Search by free-text keyword, optionally scoped to a prefecture
    ///
    /// Results keep the provider's relevance order. A blank keyword yields an
    /// empty list without a network call.
    async fn search_by_keyword(
        &self,
        keyword: &str,
        prefecture: Option<&Prefecture>,
    ) -> Result<Vec<PlaceResult>, PlacesError>;

    /// Popular spots in a prefecture, no keyword
    async fn search_popular_by_area(&self, prefecture: &Prefecture) -> Result<Vec<PlaceResult>, PlacesError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    use crate::domain::Coordinates;

    /// Recorded call to the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SearchCall {
        Keyword { keyword: String, prefecture: Option<String> },
        Area { prefecture: String },
    }

    /// Mock places client for unit tests
    ///
    /// Returns one synthetic result named after the query, optionally after a
    /// delay, or fails every call when `fail` is set.
    #[derive(Default)]
    pub struct MockPlacesClient {
        calls: Mutex<Vec<SearchCall>>,
        call_count: AtomicUsize,
        fail: AtomicBool,
        delay: Mutex<Option<Duration>>,
    }

    impl MockPlacesClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let mock = Self::default();
            mock.fail.store(true, Ordering::SeqCst);
            mock
        }

        pub fn with_delay(delay: Duration) -> Self {
            let mock = Self::default();
            *mock.delay.lock().unwrap() = Some(delay);
            mock
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<SearchCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn place(name: &str) -> PlaceResult {
            PlaceResult {
                id: format!("id-{}", name),
                name: name.to_string(),
                address: String::new(),
                coordinates: Coordinates::new(35.0, 135.0),
                rating: Some(4.0),
            }
        }

        async fn respond(&self, call: SearchCall, label: String) -> Result<Vec<PlaceResult>, PlacesError> {
            debug!(?call, "MockPlacesClient: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(call);

            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail.load(Ordering::SeqCst) {
                return Err(PlacesError::InvalidResponse("mock failure".to_string()));
            }
            Ok(vec![Self::place(&label)])
        }
    }

    #[async_trait]
    impl PlacesSearch for MockPlacesClient {
        async fn search_by_keyword(
            &self,
            keyword: &str,
            prefecture: Option<&Prefecture>,
        ) -> Result<Vec<PlaceResult>, PlacesError> {
            let call = SearchCall::Keyword {
                keyword: keyword.to_string(),
                prefecture: prefecture.map(|p| p.name().to_string()),
            };
            self.respond(call, keyword.to_string()).await
        }

        async fn search_popular_by_area(&self, prefecture: &Prefecture) -> Result<Vec<PlaceResult>, PlacesError> {
            let call = SearchCall::Area {
                prefecture: prefecture.name().to_string(),
            };
            self.respond(call, format!("popular-{}", prefecture.name())).await
        }
    }
}
