//! Point-of-interest values returned by place search

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components are finite and within the valid degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A point of interest as returned by the places provider
///
/// Read-only: search units hand these out and replace the whole list on the
/// next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Provider place identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Formatted address, empty when the provider omits it
    #[serde(default)]
    pub address: String,

    pub coordinates: Coordinates,

    /// Average user rating (1.0 - 5.0), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}
