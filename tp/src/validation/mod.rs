//! Plan validation
//!
//! Pure per-step validators plus the aggregate full-plan check.

mod result;
mod rules;

pub use result::{ValidationFailure, ValidationResult, field};
pub use rules::{
    MAX_SPOTS, MAX_TITLE_CHARS, parse_area, trip_duration_days, validate_area, validate_custom_spot, validate_dates,
    validate_plan, validate_spots, validate_title,
};
