//! Per-step validation rules
//!
//! Each function is pure: it inspects its input and returns a
//! [`ValidationResult`]. [`validate_plan`] composes them into the final
//! cross-check run before a draft becomes a plan.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::result::{ValidationFailure, ValidationResult, field};
use crate::domain::{CustomSpot, PlanDraft, Prefecture, Region, SelectedSpot};

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum number of spots (selected plus custom) in one plan
pub const MAX_SPOTS: usize = 50;

/// Trip length in days, counting both the start and end day
///
/// A same-day trip lasts 1 day. Inverted ranges are rejected.
pub fn trip_duration_days(start: NaiveDate, end: NaiveDate) -> Result<i64, ValidationFailure> {
    if end < start {
        debug!(%start, %end, "trip_duration_days: inverted range");
        return Err(ValidationFailure(ValidationResult::with_error(
            field::END_DATE,
            "End date must be on or after the start date",
        )));
    }
    Ok((end - start).num_days() + 1)
}

/// Dates step: both dates present and in order
pub fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ValidationResult {
    debug!(?start, ?end, "validate_dates: called");
    let mut result = ValidationResult::ok();

    match (start, end) {
        (Some(start), Some(end)) => {
            if let Err(failure) = trip_duration_days(start, end) {
                result.merge(failure.0);
            }
        }
        (start, end) => {
            if start.is_none() {
                result.add_error(field::START_DATE, "Start date is required");
            }
            if end.is_none() {
                result.add_error(field::END_DATE, "End date is required");
            }
        }
    }

    result
}

/// Area step: region and prefecture present, prefecture inside the region
pub fn validate_area(region: Option<Region>, prefecture: Option<Prefecture>) -> ValidationResult {
    debug!(?region, prefecture = ?prefecture.map(|p| p.name()), "validate_area: called");
    let mut result = ValidationResult::ok();

    match (region, prefecture) {
        (Some(region), Some(prefecture)) => {
            if !region.contains(&prefecture) {
                debug!(%region, %prefecture, "validate_area: prefecture outside region");
                result.add_error(
                    field::PREFECTURE,
                    format!("{} is not in the {} region", prefecture, region),
                );
            }
        }
        (region, prefecture) => {
            if region.is_none() {
                result.add_error(field::REGION, "Region is required");
            }
            if prefecture.is_none() {
                result.add_error(field::PREFECTURE, "Prefecture is required");
            }
        }
    }

    result
}

/// Parse raw region/prefecture names into typed values
///
/// Unknown names become field errors rather than parse errors so they can be
/// shown inline like any other validation message.
pub fn parse_area(region: &str, prefecture: &str) -> Result<(Region, Prefecture), ValidationFailure> {
    debug!(%region, %prefecture, "parse_area: called");
    let mut result = ValidationResult::ok();

    let parsed_region = if region.trim().is_empty() {
        result.add_error(field::REGION, "Region is required");
        None
    } else {
        let found = Region::lookup(region);
        if found.is_none() {
            result.add_error(field::REGION, format!("Unknown region: {}", region.trim()));
        }
        found
    };

    let parsed_prefecture = if prefecture.trim().is_empty() {
        result.add_error(field::PREFECTURE, "Prefecture is required");
        None
    } else {
        let found = Prefecture::lookup(prefecture);
        if found.is_none() {
            result.add_error(field::PREFECTURE, format!("Unknown prefecture: {}", prefecture.trim()));
        }
        found
    };

    result.merge(validate_area(parsed_region, parsed_prefecture));
    result.into_result()?;

    match (parsed_region, parsed_prefecture) {
        (Some(region), Some(prefecture)) => Ok((region, prefecture)),
        _ => Err(ValidationFailure(ValidationResult::with_error(
            field::PREFECTURE,
            "Prefecture is required",
        ))),
    }
}

/// Spots step: at least one spot overall, no duplicates, sane values
pub fn validate_spots(spots: &[SelectedSpot], custom_spots: &[CustomSpot]) -> ValidationResult {
    debug!(
        spot_count = spots.len(),
        custom_count = custom_spots.len(),
        "validate_spots: called"
    );
    let mut result = ValidationResult::ok();

    let total = spots.len() + custom_spots.len();
    if total == 0 {
        result.add_error(field::SPOTS, "Select at least one spot");
    } else if total > MAX_SPOTS {
        result.add_error(field::SPOTS, format!("A plan can hold at most {} spots", MAX_SPOTS));
    }

    let mut seen_ids = HashSet::new();
    for spot in spots {
        if spot.place_id.trim().is_empty() {
            result.add_error(field::SPOTS, format!("Spot '{}' has no place id", spot.name));
        } else if !seen_ids.insert(spot.place_id.as_str()) {
            result.add_error(field::SPOTS, format!("Spot '{}' is selected twice", spot.name));
        }
        if !spot.coordinates.is_valid() {
            result.add_error(field::SPOTS, format!("Spot '{}' has invalid coordinates", spot.name));
        }
    }

    let mut seen_names = HashSet::new();
    for spot in custom_spots {
        let name = spot.name.trim();
        if name.is_empty() {
            result.add_error(field::CUSTOM_SPOTS, "Custom spot name must not be empty");
        } else if !seen_names.insert(CustomSpot::name_key(name)) {
            result.add_error(field::CUSTOM_SPOTS, format!("Custom spot '{}' is listed twice", name));
        }
    }

    result
}

/// Check a single custom spot against the ones already in the draft
pub fn validate_custom_spot(spot: &CustomSpot, existing: &[CustomSpot]) -> ValidationResult {
    let name = spot.name.trim();
    if name.is_empty() {
        return ValidationResult::with_error(field::CUSTOM_SPOTS, "Custom spot name must not be empty");
    }
    if existing.iter().any(|s| s.is_named(name)) {
        return ValidationResult::with_error(field::CUSTOM_SPOTS, format!("Custom spot '{}' already exists", name));
    }
    ValidationResult::ok()
}

/// Title: optional, but not blank and not overlong when given
pub fn validate_title(title: Option<&str>) -> ValidationResult {
    match title {
        Some(t) if t.trim().is_empty() => ValidationResult::with_error(field::TITLE, "Title must not be blank"),
        Some(t) if t.chars().count() > MAX_TITLE_CHARS => ValidationResult::with_error(
            field::TITLE,
            format!("Title must be at most {} characters", MAX_TITLE_CHARS),
        ),
        _ => ValidationResult::ok(),
    }
}

/// Full-plan cross-check combining every step
pub fn validate_plan(draft: &PlanDraft) -> ValidationResult {
    debug!("validate_plan: called");
    let mut result = validate_title(draft.title.as_deref());
    result.merge(validate_dates(draft.start_date, draft.end_date));
    result.merge(validate_area(draft.region, draft.prefecture));
    result.merge(validate_spots(&draft.spots, &draft.custom_spots));
    debug!(valid = result.is_valid(), "validate_plan: done");
    result
}
