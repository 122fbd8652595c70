//! Domain types for trip planning

mod draft;
mod place;
mod plan;
mod region;

pub use draft::{CustomSpot, PlanDraft, SelectedSpot};
pub use place::{Coordinates, PlaceResult};
pub use plan::Plan;
pub use region::{Prefecture, Region, UnknownArea};
