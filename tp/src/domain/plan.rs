//! Finalized Plan
//!
//! A Plan is what a completed PlanDraft turns into. It is handed to the plan
//! store as JSON; storage itself lives outside this crate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::draft::{CustomSpot, SelectedSpot};
use super::region::{Prefecture, Region};

/// A validated, complete trip plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier (UUIDv7, time ordered)
    pub id: Uuid,

    pub title: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Trip length in days, inclusive of both ends
    pub duration_days: i64,

    pub region: Region,

    pub prefecture: Prefecture,

    pub spots: Vec<SelectedSpot>,

    pub custom_spots: Vec<CustomSpot>,

    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Title used when the user left it blank
    pub fn default_title(prefecture: &Prefecture, start_date: NaiveDate) -> String {
        format!("{} trip ({})", prefecture.name(), start_date.format("%Y-%m-%d"))
    }
}
