//! PlanSession - single-writer state for one plan-creation flow
//!
//! A session is created when the flow starts and dropped when the user
//! finishes or abandons it. Each update validates its step before touching
//! the draft; a rejected update leaves the draft exactly as it was.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{CustomSpot, Plan, PlanDraft, PlaceResult, Prefecture, Region, SelectedSpot};
use crate::validation::{
    MAX_SPOTS, ValidationFailure, ValidationResult, field, trip_duration_days, validate_area, validate_custom_spot,
    validate_dates, validate_plan, validate_spots, validate_title,
};

/// Creation steps, in the order the flow presents them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanStep {
    Dates,
    Area,
    Spots,
    Review,
}

/// In-progress plan creation owned by one user
#[derive(Debug, Default)]
pub struct PlanSession {
    draft: PlanDraft,
}

impl PlanSession {
    /// Start a fresh session with an empty draft
    pub fn new() -> Self {
        debug!("PlanSession::new: called");
        Self::default()
    }

    /// Resume from an existing draft (e.g. one loaded from a file)
    pub fn from_draft(draft: PlanDraft) -> Self {
        debug!("PlanSession::from_draft: called");
        Self { draft }
    }

    /// Read-only view of the current draft
    pub fn draft(&self) -> &PlanDraft {
        &self.draft
    }

    /// First step that does not validate yet
    pub fn current_step(&self) -> PlanStep {
        if !validate_dates(self.draft.start_date, self.draft.end_date).is_valid() {
            PlanStep::Dates
        } else if !validate_area(self.draft.region, self.draft.prefecture).is_valid() {
            PlanStep::Area
        } else if !validate_spots(&self.draft.spots, &self.draft.custom_spots).is_valid() {
            PlanStep::Spots
        } else {
            PlanStep::Review
        }
    }

    /// Trip length in days, once both dates are set
    pub fn duration_days(&self) -> Option<i64> {
        match (self.draft.start_date, self.draft.end_date) {
            (Some(start), Some(end)) => trip_duration_days(start, end).ok(),
            _ => None,
        }
    }

    pub fn set_title(&mut self, title: Option<String>) -> Result<(), ValidationFailure> {
        debug!(?title, "set_title: called");
        validate_title(title.as_deref()).into_result()?;
        self.draft.title = title.map(|t| t.trim().to_string());
        Ok(())
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), ValidationFailure> {
        debug!(%start, %end, "set_dates: called");
        validate_dates(Some(start), Some(end)).into_result()?;
        self.draft.start_date = Some(start);
        self.draft.end_date = Some(end);
        Ok(())
    }

    /// Set region and prefecture
    ///
    /// Moving to a different prefecture drops the selected spots, since they
    /// came from the previous prefecture's searches. Custom spots are kept.
    pub fn set_area(&mut self, region: Region, prefecture: Prefecture) -> Result<(), ValidationFailure> {
        debug!(%region, %prefecture, "set_area: called");
        validate_area(Some(region), Some(prefecture)).into_result()?;

        if self.draft.prefecture.is_some_and(|p| p != prefecture) && !self.draft.spots.is_empty() {
            info!(
                from = ?self.draft.prefecture.map(|p| p.name()),
                to = %prefecture,
                dropped = self.draft.spots.len(),
                "set_area: prefecture changed, clearing selected spots"
            );
            self.draft.spots.clear();
        }

        self.draft.region = Some(region);
        self.draft.prefecture = Some(prefecture);
        Ok(())
    }

    /// Replace the selected spots wholesale
    pub fn set_spots(&mut self, spots: Vec<SelectedSpot>) -> Result<(), ValidationFailure> {
        debug!(count = spots.len(), "set_spots: called");
        validate_spots(&spots, &self.draft.custom_spots).into_result()?;
        self.draft.spots = spots;
        Ok(())
    }

    /// Add one spot from a search result
    ///
    /// Only duplicate and capacity checks apply here; the non-empty rule is
    /// enforced when the spot list is committed or the plan is finalized.
    pub fn add_spot(&mut self, place: &PlaceResult) -> Result<(), ValidationFailure> {
        debug!(place_id = %place.id, name = %place.name, "add_spot: called");
        let spot = SelectedSpot::from(place);

        if self.draft.spots.iter().any(|s| s.place_id == spot.place_id) {
            return Err(ValidationFailure(ValidationResult::with_error(
                field::SPOTS,
                format!("Spot '{}' is already selected", spot.name),
            )));
        }
        if self.draft.spot_count() >= MAX_SPOTS {
            return Err(ValidationFailure(ValidationResult::with_error(
                field::SPOTS,
                format!("A plan can hold at most {} spots", MAX_SPOTS),
            )));
        }

        let mut candidate = self.draft.spots.clone();
        candidate.push(spot);
        self.set_spots(candidate)
    }

    /// Remove a selected spot by place id, returning it if present
    pub fn remove_spot(&mut self, place_id: &str) -> Option<SelectedSpot> {
        debug!(%place_id, "remove_spot: called");
        let index = self.draft.spots.iter().position(|s| s.place_id == place_id)?;
        Some(self.draft.spots.remove(index))
    }

    pub fn add_custom_spot(&mut self, spot: CustomSpot) -> Result<(), ValidationFailure> {
        debug!(name = %spot.name, "add_custom_spot: called");
        validate_custom_spot(&spot, &self.draft.custom_spots).into_result()?;
        if self.draft.spot_count() >= MAX_SPOTS {
            return Err(ValidationFailure(ValidationResult::with_error(
                field::CUSTOM_SPOTS,
                format!("A plan can hold at most {} spots", MAX_SPOTS),
            )));
        }

        self.draft.custom_spots.push(CustomSpot {
            name: spot.name.trim().to_string(),
            note: spot.note,
        });
        Ok(())
    }

    /// Remove a custom spot by name (case-insensitive), returning it if present
    pub fn remove_custom_spot(&mut self, name: &str) -> Option<CustomSpot> {
        debug!(%name, "remove_custom_spot: called");
        let index = self.draft.custom_spots.iter().position(|s| s.is_named(name))?;
        Some(self.draft.custom_spots.remove(index))
    }

    /// Run the full-plan check without consuming the session
    pub fn validate(&self) -> ValidationResult {
        validate_plan(&self.draft)
    }

    /// Convert the draft into a Plan, consuming the session
    ///
    /// On failure the session is handed back untouched with the errors.
    pub fn finalize(self) -> Result<Plan, (Self, ValidationFailure)> {
        debug!("finalize: called");
        if let Err(failure) = validate_plan(&self.draft).into_result() {
            debug!(%failure, "finalize: draft not ready");
            return Err((self, failure));
        }

        let draft = self.draft;
        let (Some(start_date), Some(end_date), Some(region), Some(prefecture)) =
            (draft.start_date, draft.end_date, draft.region, draft.prefecture)
        else {
            // validate_plan guarantees presence; keep the session intact regardless
            let failure = ValidationFailure(validate_plan(&draft));
            return Err((Self { draft }, failure));
        };

        let duration_days = match trip_duration_days(start_date, end_date) {
            Ok(days) => days,
            Err(failure) => return Err((Self { draft }, failure)),
        };

        let title = draft
            .title
            .clone()
            .unwrap_or_else(|| Plan::default_title(&prefecture, start_date));

        let plan = Plan {
            id: Uuid::now_v7(),
            title,
            start_date,
            end_date,
            duration_days,
            region,
            prefecture,
            spots: draft.spots,
            custom_spots: draft.custom_spots,
            created_at: Utc::now(),
        };
        info!(plan_id = %plan.id, title = %plan.title, duration_days, "Plan finalized");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn place(id: &str, name: &str) -> PlaceResult {
        PlaceResult {
            id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            coordinates: Coordinates::new(34.68, 135.52),
            rating: None,
        }
    }

    fn pref(name: &str) -> Prefecture {
        Prefecture::lookup(name).unwrap()
    }

    #[test]
    fn test_new_session_starts_at_dates() {
        let session = PlanSession::new();
        assert!(session.draft().is_empty());
        assert_eq!(session.current_step(), PlanStep::Dates);
        assert_eq!(session.duration_days(), None);
    }

    #[test]
    fn test_set_dates_rejects_inverted_and_keeps_state() {
        let mut session = PlanSession::new();
        session.set_dates(date(2025, 4, 1), date(2025, 4, 3)).unwrap();

        let err = session.set_dates(date(2025, 5, 5), date(2025, 5, 1)).unwrap_err();
        assert!(err.result().error(field::END_DATE).is_some());

        assert_eq!(session.draft().start_date, Some(date(2025, 4, 1)));
        assert_eq!(session.draft().end_date, Some(date(2025, 4, 3)));
        assert_eq!(session.duration_days(), Some(3));
    }

    #[test]
    fn test_set_area_rejects_mismatch() {
        let mut session = PlanSession::new();
        let err = session.set_area(Region::Kanto, pref("Osaka")).unwrap_err();
        assert!(err.result().error(field::PREFECTURE).is_some());
        assert_eq!(session.draft().region, None);
        assert_eq!(session.draft().prefecture, None);
    }

    #[test]
    fn test_changing_prefecture_clears_selected_spots() {
        let mut session = PlanSession::new();
        session.set_area(Region::Kansai, pref("Osaka")).unwrap();
        session.add_spot(&place("p1", "Osaka Castle")).unwrap();
        session.add_custom_spot(CustomSpot::new("Hotel")).unwrap();

        // Same prefecture again keeps spots
        session.set_area(Region::Kansai, pref("Osaka")).unwrap();
        assert_eq!(session.draft().spots.len(), 1);

        session.set_area(Region::Kansai, pref("Kyoto")).unwrap();
        assert!(session.draft().spots.is_empty());
        assert_eq!(session.draft().custom_spots.len(), 1);
    }

    #[test]
    fn test_add_spot_rejects_duplicate() {
        let mut session = PlanSession::new();
        session.add_spot(&place("p1", "Dotonbori")).unwrap();
        let err = session.add_spot(&place("p1", "Dotonbori")).unwrap_err();
        assert_eq!(err.result().error(field::SPOTS), Some("Spot 'Dotonbori' is already selected"));
        assert_eq!(session.draft().spots.len(), 1);
    }

    #[test]
    fn test_set_spots_empty_rejected() {
        let mut session = PlanSession::new();
        session.add_spot(&place("p1", "Dotonbori")).unwrap();
        assert!(session.set_spots(vec![]).is_err());
        assert_eq!(session.draft().spots.len(), 1);
    }

    #[test]
    fn test_remove_spot() {
        let mut session = PlanSession::new();
        session.add_spot(&place("p1", "Dotonbori")).unwrap();
        session.add_spot(&place("p2", "Umeda Sky")).unwrap();

        let removed = session.remove_spot("p1").unwrap();
        assert_eq!(removed.name, "Dotonbori");
        assert!(session.remove_spot("p1").is_none());
        assert_eq!(session.draft().spots.len(), 1);
    }

    #[test]
    fn test_custom_spots() {
        let mut session = PlanSession::new();
        session.add_custom_spot(CustomSpot::with_note("  Onsen  ", "book ahead")).unwrap();
        assert_eq!(session.draft().custom_spots[0].name, "Onsen");

        assert!(session.add_custom_spot(CustomSpot::new("ONSEN")).is_err());
        assert!(session.add_custom_spot(CustomSpot::new("")).is_err());

        let removed = session.remove_custom_spot("onsen").unwrap();
        assert_eq!(removed.note.as_deref(), Some("book ahead"));
        assert!(session.draft().custom_spots.is_empty());
    }

    #[test]
    fn test_full_width_custom_spots_match_plan_check() {
        let mut session = PlanSession::new();
        session.add_custom_spot(CustomSpot::new("Ｃａｆｅ")).unwrap();

        assert!(session.add_custom_spot(CustomSpot::new("ｃａｆｅ")).is_err());
        assert_eq!(session.draft().custom_spots.len(), 1);
        assert!(session.validate().error(field::CUSTOM_SPOTS).is_none());

        let removed = session.remove_custom_spot(" ｃａｆｅ ").unwrap();
        assert_eq!(removed.name, "Ｃａｆｅ");
        assert!(session.draft().custom_spots.is_empty());
    }

    #[test]
    fn test_set_title() {
        let mut session = PlanSession::new();
        session.set_title(Some(" Food tour ".to_string())).unwrap();
        assert_eq!(session.draft().title.as_deref(), Some("Food tour"));

        assert!(session.set_title(Some("  ".to_string())).is_err());
        assert_eq!(session.draft().title.as_deref(), Some("Food tour"));

        session.set_title(None).unwrap();
        assert_eq!(session.draft().title, None);
    }

    #[test]
    fn test_steps_progress() {
        let mut session = PlanSession::new();
        session.set_dates(date(2025, 4, 1), date(2025, 4, 3)).unwrap();
        assert_eq!(session.current_step(), PlanStep::Area);

        session.set_area(Region::Kansai, pref("Osaka")).unwrap();
        assert_eq!(session.current_step(), PlanStep::Spots);

        session.add_spot(&place("p1", "Osaka Castle")).unwrap();
        assert_eq!(session.current_step(), PlanStep::Review);
    }

    #[test]
    fn test_finalize_osaka() {
        let mut session = PlanSession::new();
        session.set_dates(date(2025, 4, 1), date(2025, 4, 3)).unwrap();
        session.set_area(Region::Kansai, pref("Osaka")).unwrap();
        session.add_spot(&place("p1", "Osaka Castle")).unwrap();
        assert!(session.validate().is_valid());

        let plan = session.finalize().unwrap();
        assert_eq!(plan.duration_days, 3);
        assert_eq!(plan.region, Region::Kansai);
        assert_eq!(plan.prefecture.name(), "Osaka");
        assert_eq!(plan.title, "Osaka trip (2025-04-01)");
        assert_eq!(plan.spots.len(), 1);
    }

    #[test]
    fn test_finalize_incomplete_returns_session() {
        let mut session = PlanSession::new();
        session.set_dates(date(2025, 4, 1), date(2025, 4, 1)).unwrap();

        let (session, failure) = session.finalize().unwrap_err();
        assert!(failure.result().error(field::REGION).is_some());
        assert!(failure.result().error(field::SPOTS).is_some());
        assert_eq!(session.duration_days(), Some(1));
    }
}
