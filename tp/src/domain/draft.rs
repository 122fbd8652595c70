//! PlanDraft domain type
//!
//! A PlanDraft is the in-progress trip plan assembled step by step before it
//! is finalized into a [`Plan`](super::Plan).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::place::{Coordinates, PlaceResult};
use super::region::{Prefecture, Region};

/// A spot picked from place search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSpot {
    /// Provider place identifier
    pub place_id: String,

    pub name: String,

    pub coordinates: Coordinates,
}

impl From<&PlaceResult> for SelectedSpot {
    fn from(place: &PlaceResult) -> Self {
        Self {
            place_id: place.id.clone(),
            name: place.name.clone(),
            coordinates: place.coordinates,
        }
    }
}

/// A spot the user typed in themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSpot {
    pub name: String,

    /// Free-form note (address, opening hours, reminder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CustomSpot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: None,
        }
    }

    pub fn with_note(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: Some(note.into()),
        }
    }

    /// Key two custom spots are compared by: trimmed, Unicode lowercase
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Whether this spot's name matches `name` under [`CustomSpot::name_key`]
    pub fn is_named(&self, name: &str) -> bool {
        Self::name_key(&self.name) == Self::name_key(name)
    }
}

/// In-progress trip plan
///
/// Every field starts empty; each creation step fills in its part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDraft {
    /// Optional user-facing title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "start-date")]
    pub start_date: Option<NaiveDate>,

    #[serde(rename = "end-date")]
    pub end_date: Option<NaiveDate>,

    pub region: Option<Region>,

    pub prefecture: Option<Prefecture>,

    pub spots: Vec<SelectedSpot>,

    #[serde(rename = "custom-spots")]
    pub custom_spots: Vec<CustomSpot>,
}

impl PlanDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of spots, selected and custom
    pub fn spot_count(&self) -> usize {
        self.spots.len() + self.custom_spots.len()
    }

    /// Whether no step has been filled in yet
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
