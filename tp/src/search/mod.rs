//! Search units feeding spot choices into the plan flow
//!
//! [`KeywordSearch`] debounces free-text input; [`AreaSearch`] fetches
//! popular spots as soon as a prefecture is picked. Both publish their state
//! on a watch channel and let the most recent input win.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

mod area;
mod debounce;
mod keyword;
mod state;

pub use area::AreaSearch;
pub use debounce::{Debouncer, ScheduledTask};
pub use keyword::KeywordSearch;
pub use state::{SearchState, SearchStatus};

use crate::places::PlacesSearch;

/// Search behaviour configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a keyword search fires, in milliseconds
    #[serde(rename = "debounce-ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Build a keyword search unit using this configuration
    pub fn keyword_search(&self, client: Arc<dyn PlacesSearch>) -> KeywordSearch {
        KeywordSearch::new(client, self.debounce())
    }
}
