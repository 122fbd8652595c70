//! Place search error types

use thiserror::Error;

/// Errors that can occur during place search
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("API key not configured: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlacesError {
    /// Check if the provider rejected us for quota reasons
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PlacesError::ApiError { status: 429, .. })
    }

    /// Check if this error is worth retrying later
    pub fn is_retryable(&self) -> bool {
        match self {
            PlacesError::ApiError { status, .. } => *status == 429 || *status >= 500,
            PlacesError::Network(_) => true,
            PlacesError::MissingApiKey(_) => false,
            PlacesError::InvalidResponse(_) => false,
            PlacesError::Json(_) => false,
        }
    }
}
