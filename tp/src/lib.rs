//! TripPlan - trip plan drafting and place search
//!
//! TripPlan holds the multi-step plan-creation workflow behind the trip
//! planner bot: a user picks dates, an area, and spots, and each step is
//! validated before it is committed.
//!
//! # Core Concepts
//!
//! - **Session-scoped drafts**: a [`PlanSession`] owns one draft; no global state
//! - **Pure validators**: each step has a function returning a [`ValidationResult`]
//! - **Last input wins**: search units debounce and drop stale results
//! - **Silent degradation**: search failures become empty result lists
//!
//! # Modules
//!
//! - [`domain`] - Plan, draft, place, and region types
//! - [`validation`] - Per-step and full-plan validators
//! - [`session`] - Single-writer plan-creation session
//! - [`places`] - Places provider trait and Google implementation
//! - [`search`] - Debounced keyword search and area search units
//! - [`policy`] - Log-and-continue / log-and-abort failure policy

pub mod domain;
pub mod places;
pub mod policy;
pub mod search;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use domain::{Coordinates, CustomSpot, PlaceResult, Plan, PlanDraft, Prefecture, Region, SelectedSpot, UnknownArea};
pub use places::{GooglePlacesClient, PlacesConfig, PlacesError, PlacesSearch, create_client};
pub use policy::FailurePolicy;
pub use search::{AreaSearch, Debouncer, KeywordSearch, ScheduledTask, SearchConfig, SearchState, SearchStatus};
pub use session::{PlanSession, PlanStep};
pub use validation::{ValidationFailure, ValidationResult, trip_duration_days, validate_plan};
