//! Google Places API (New) client implementation
//!
//! Implements the PlacesSearch trait on top of the `places:searchText`
//! endpoint. Both keyword and area searches are text searches; area searches
//! use a fixed "sightseeing spots" query for the prefecture.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PlacesConfig, PlacesError, PlacesSearch};
use crate::domain::{Coordinates, PlaceResult, Prefecture};

/// Fields requested from the provider; billing depends on this mask
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,places.rating";

/// Provider limit on results per text search
const MAX_RESULT_COUNT: u32 = 20;

/// Google Places API client
pub struct GooglePlacesClient {
    api_key: String,
    base_url: String,
    language_code: String,
    max_results: u32,
    http: Client,
}

impl GooglePlacesClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key()?;
        Self::new(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn new(api_key: impl Into<String>, config: &PlacesConfig) -> Result<Self, PlacesError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(PlacesError::Network)?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language_code: config.language_code.clone(),
            max_results: config.max_results.clamp(1, MAX_RESULT_COUNT),
            http,
        })
    }

    fn prefecture_label(&self, prefecture: &Prefecture) -> &'static str {
        if self.language_code == "ja" {
            prefecture.name_ja()
        } else {
            prefecture.name()
        }
    }

    /// Text query used for keyword searches
    fn keyword_query(&self, keyword: &str, prefecture: Option<&Prefecture>) -> String {
        match prefecture {
            Some(p) => format!("{} {}", keyword.trim(), self.prefecture_label(p)),
            None => keyword.trim().to_string(),
        }
    }

    /// Text query used for popular-spot searches
    fn area_query(&self, prefecture: &Prefecture) -> String {
        if self.language_code == "ja" {
            format!("{} 観光スポット", prefecture.name_ja())
        } else {
            format!("tourist attractions in {}", prefecture.name())
        }
    }

    async fn text_search(&self, query: &str) -> Result<Vec<PlaceResult>, PlacesError> {
        debug!(%query, "text_search: called");
        let url = format!("{}/v1/places:searchText", self.base_url);
        let body = serde_json::json!({
            "textQuery": query,
            "languageCode": self.language_code,
            "maxResultCount": self.max_results,
        });

        let response = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!(status = status.as_u16(), %message, "text_search: provider returned error");
            return Err(PlacesError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GoogleSearchResponse = serde_json::from_str(&text)?;
        let results: Vec<PlaceResult> = parsed.places.into_iter().filter_map(GooglePlace::into_result).collect();
        debug!(count = results.len(), "text_search: mapped results");
        Ok(results)
    }
}

#[async_trait]
impl PlacesSearch for GooglePlacesClient {
    async fn search_by_keyword(
        &self,
        keyword: &str,
        prefecture: Option<&Prefecture>,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        if keyword.trim().is_empty() {
            debug!("search_by_keyword: blank keyword, skipping request");
            return Ok(Vec::new());
        }
        let query = self.keyword_query(keyword, prefecture);
        self.text_search(&query).await
    }

    async fn search_popular_by_area(&self, prefecture: &Prefecture) -> Result<Vec<PlaceResult>, PlacesError> {
        let query = self.area_query(prefecture);
        self.text_search(&query).await
    }
}

#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePlace {
    id: Option<String>,
    display_name: Option<GoogleLocalizedText>,
    formatted_address: Option<String>,
    location: Option<GoogleLatLng>,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GoogleLocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleLatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

impl GooglePlace {
    /// Map into a PlaceResult, dropping entries without an id or location
    fn into_result(self) -> Option<PlaceResult> {
        let id = self.id?;
        let location = self.location?;
        let name = self.display_name.map(|n| n.text).unwrap_or_else(|| id.clone());
        Some(PlaceResult {
            id,
            name,
            address: self.formatted_address.unwrap_or_default(),
            coordinates: Coordinates::new(location.latitude, location.longitude),
            rating: self.rating,
        })
    }
}
