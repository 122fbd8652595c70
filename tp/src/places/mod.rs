//! Places search module
//!
//! Provides the PlacesSearch trait and the Google Places implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod config;
mod error;
mod google;

pub use client::PlacesSearch;
pub use config::PlacesConfig;
pub use error::PlacesError;
pub use google::GooglePlacesClient;

/// Create a places client from configuration
pub fn create_client(config: &PlacesConfig) -> Result<Arc<dyn PlacesSearch>, PlacesError> {
    debug!(base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(GooglePlacesClient::from_config(config)?))
}
