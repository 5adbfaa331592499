use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::{Calendar, GridPos, Home, MealCatalog, MealType, Slot, SlotNote};
use crate::planner::{
    autofill, preferred_meals, prepare_batch, prepare_fresh, AutofillOptions, LeftoverLedger,
};

/// Everything a planning session mutates: per-home calendars and the
/// leftover ledger.
///
/// A home has a calendar only once at least one meal was assigned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    calendars: BTreeMap<String, Calendar>,
    #[serde(default)]
    ledger: LeftoverLedger,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calendar(&self, home_id: &str) -> Option<&Calendar> {
        self.calendars.get(home_id)
    }

    pub fn calendars(&self) -> impl Iterator<Item = (&String, &Calendar)> {
        self.calendars.iter()
    }

    pub fn ledger(&self) -> &LeftoverLedger {
        &self.ledger
    }

    /// Auto-fill the home's calendar unless it already has one.
    ///
    /// Returns true when a calendar was generated.
    pub fn prepare_home(
        &mut self,
        home: &Home,
        catalog: &MealCatalog,
        options: &AutofillOptions,
    ) -> Result<bool> {
        let has_meals = self
            .calendars
            .get(&home.id)
            .is_some_and(|c| c.planned_count() > 0);
        if has_meals {
            return Ok(false);
        }

        let Some(plan) = autofill(home, catalog, options)? else {
            tracing::warn!(home = %home.id, "home prefers no catalog meals, nothing to plan");
            return Ok(false);
        };

        for allocation in &plan.allocations {
            self.ledger.merge(&home.id, allocation);
        }
        self.calendars.insert(home.id.clone(), plan.calendar);
        Ok(true)
    }

    /// Place a preferred meal in a cell.
    ///
    /// Leftovers waiting at the cell are used up first; otherwise a fresh
    /// batch is prepared and its surplus carried forward.
    pub fn assign_meal(
        &mut self,
        home: &Home,
        catalog: &MealCatalog,
        pos: GridPos,
        meal_type: MealType,
        meal_id: &str,
    ) -> Result<SlotNote> {
        let meal = preferred_meals(catalog, home, meal_type, None)
            .into_iter()
            .find(|m| m.id == meal_id)
            .ok_or_else(|| MenuError::MealNotFound {
                meal_type,
                id: meal_id.to_string(),
            })?;

        // Validate before touching the ledger so a failed prepare leaves it intact.
        if home.residents == 0 {
            return Err(MenuError::InvalidInput(format!(
                "home {} has no residents",
                home.id
            )));
        }

        let calendar = self.calendars.entry(home.id.clone()).or_default();

        // A batch previously cooked here is being replaced, along with
        // whatever later cells were eating from it.
        let mut consumers = Vec::new();
        if matches!(
            calendar.slot(pos, meal_type).and_then(|s| s.note),
            Some(SlotNote::PrepareNew { .. })
        ) {
            consumers = calendar.leftover_consumers(meal_type, pos);
            self.ledger.withdraw_source(&home.id, meal_type, pos);
        }

        let slot = calendar.slot_mut(pos, meal_type).ok_or_else(|| {
            MenuError::InvalidInput(format!("{} is outside the calendar", pos))
        })?;

        let note = if let Some(entry) = self.ledger.take(&home.id, pos, meal_type) {
            slot.meal_id = Some(meal.id.clone());
            slot.servings = None;
            let note = SlotNote::UseLeftovers {
                servings: entry.servings,
                source: entry.source,
            };
            slot.note = Some(note);
            tracing::info!(home = %home.id, %pos, %meal_type, servings = entry.servings, "used leftovers");
            note
        } else {
            let allocation = prepare_fresh(slot, meal, home.residents, pos, meal_type)?;
            let note = slot.note.unwrap_or(SlotNote::PrepareNew { leftover: 0 });
            self.ledger.merge(&home.id, &allocation);
            tracing::info!(home = %home.id, %pos, %meal_type, meal = %meal.id, "prepared new meal");
            note
        };

        self.replan_consumers(home, catalog, meal_type, &consumers)?;
        Ok(note)
    }

    /// Change the batch size of the meal planned in a cell.
    pub fn change_serving_size(
        &mut self,
        home: &Home,
        catalog: &MealCatalog,
        pos: GridPos,
        meal_type: MealType,
        servings: u32,
    ) -> Result<SlotNote> {
        let meal_id = self
            .calendars
            .get(&home.id)
            .and_then(|c| c.slot(pos, meal_type))
            .and_then(|s| s.meal_id.clone())
            .ok_or_else(|| {
                MenuError::InvalidInput(format!("no {} planned at {}", meal_type, pos))
            })?;

        let meal = catalog
            .find(meal_type, &meal_id)
            .ok_or_else(|| MenuError::MealNotFound {
                meal_type,
                id: meal_id.clone(),
            })?;

        if !meal.offers_servings(servings) {
            return Err(MenuError::InvalidInput(format!(
                "{} is not prepared in batches of {} (options: {:?})",
                meal.name, servings, meal.servings
            )));
        }

        let calendar = self
            .calendars
            .get_mut(&home.id)
            .ok_or_else(|| MenuError::HomeNotFound(home.id.clone()))?;
        let consumers = calendar.leftover_consumers(meal_type, pos);
        let slot = calendar.slot_mut(pos, meal_type).ok_or_else(|| {
            MenuError::InvalidInput(format!("{} is outside the calendar", pos))
        })?;

        let allocation = prepare_batch(slot, meal, servings, home.residents, pos, meal_type)?;
        let note = slot.note.unwrap_or(SlotNote::PrepareNew { leftover: 0 });
        let withdrawn = self.ledger.withdraw_source(&home.id, meal_type, pos);
        self.ledger.merge(&home.id, &allocation);

        tracing::debug!(
            home = %home.id,
            %pos,
            %meal_type,
            servings,
            withdrawn,
            carried = allocation.total(),
            "serving size changed"
        );

        self.replan_consumers(home, catalog, meal_type, &consumers)?;
        Ok(note)
    }

    /// Re-plan cells that were eating from a batch that has since changed.
    ///
    /// Each cell takes whatever surplus now waits for it, or cooks its meal
    /// fresh when none does.
    fn replan_consumers(
        &mut self,
        home: &Home,
        catalog: &MealCatalog,
        meal_type: MealType,
        consumers: &[GridPos],
    ) -> Result<()> {
        let Some(calendar) = self.calendars.get_mut(&home.id) else {
            return Ok(());
        };

        for &pos in consumers {
            let Some(slot) = calendar.slot_mut(pos, meal_type) else {
                continue;
            };

            if let Some(entry) = self.ledger.take(&home.id, pos, meal_type) {
                slot.servings = None;
                slot.note = Some(SlotNote::UseLeftovers {
                    servings: entry.servings,
                    source: entry.source,
                });
                tracing::debug!(home = %home.id, %pos, %meal_type, servings = entry.servings, "leftovers re-taken");
                continue;
            }

            let meal = slot
                .meal_id
                .as_deref()
                .and_then(|id| catalog.find(meal_type, id));
            match meal {
                Some(meal) => {
                    let allocation = prepare_fresh(slot, meal, home.residents, pos, meal_type)?;
                    self.ledger.merge(&home.id, &allocation);
                    tracing::info!(home = %home.id, %pos, %meal_type, meal = %meal.id, "leftovers gone, cooking fresh");
                }
                None => {
                    tracing::warn!(home = %home.id, %pos, %meal_type, "leftovers gone and meal not in catalog, slot cleared");
                    *slot = Slot::default();
                }
            }
        }
        Ok(())
    }

    /// Forget a home's calendar and leftovers.
    pub fn reset_home(&mut self, home_id: &str) -> bool {
        let removed = self.calendars.remove(home_id).is_some();
        let entries = self.ledger.clear_home(home_id);
        if removed || entries > 0 {
            tracing::info!(home = %home_id, ledger_entries = entries, "reset home plan");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meal;

    fn pos(week: usize, day: usize) -> GridPos {
        GridPos::new(week, day).unwrap()
    }

    fn sample_catalog() -> MealCatalog {
        MealCatalog {
            breakfast: vec![],
            lunch: vec![],
            dinner: vec![
                Meal {
                    id: "d1".to_string(),
                    name: "Lasagna".to_string(),
                    servings: vec![10, 4, 12],
                    popularity: Some(3),
                },
                Meal {
                    id: "d2".to_string(),
                    name: "Tacos".to_string(),
                    servings: vec![4],
                    popularity: Some(1),
                },
            ],
        }
    }

    fn sample_home() -> Home {
        Home {
            id: "H1".to_string(),
            name: "Maple House".to_string(),
            residents: 4,
            breakfast_preferences: vec![],
            lunch_preferences: vec![],
            dinner_preferences: vec!["d1".to_string(), "d2".to_string()],
            dietary_restrictions: vec![],
        }
    }

    #[test]
    fn test_calendar_created_lazily() {
        let mut session = SessionState::new();
        let home = sample_home();
        assert!(session.calendar("H1").is_none());

        let err = session
            .assign_meal(&home, &sample_catalog(), pos(0, 0), MealType::Dinner, "nope")
            .unwrap_err();
        assert!(matches!(err, MenuError::MealNotFound { .. }));
        assert!(session.calendar("H1").is_none());

        session
            .assign_meal(&home, &sample_catalog(), pos(0, 0), MealType::Dinner, "d2")
            .unwrap();
        assert!(session.calendar("H1").is_some());
    }

    #[test]
    fn test_assign_then_consume_leftovers() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();

        let note = session
            .assign_meal(&home, &catalog, pos(0, 5), MealType::Dinner, "d1")
            .unwrap();
        assert_eq!(note, SlotNote::PrepareNew { leftover: 6 });
        assert_eq!(session.ledger().len(), 2);

        let note = session
            .assign_meal(&home, &catalog, pos(0, 6), MealType::Dinner, "d2")
            .unwrap();
        assert_eq!(
            note,
            SlotNote::UseLeftovers {
                servings: 4,
                source: pos(0, 5)
            }
        );
        assert!(session.ledger().get("H1", pos(0, 6), MealType::Dinner).is_none());

        // The entry was consumed, so the next assignment cooks fresh.
        let note = session
            .assign_meal(&home, &catalog, pos(0, 6), MealType::Dinner, "d2")
            .unwrap();
        assert_eq!(note, SlotNote::PrepareNew { leftover: 0 });
    }

    #[test]
    fn test_change_serving_size_replaces_surplus() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();

        session
            .assign_meal(&home, &catalog, pos(0, 0), MealType::Dinner, "d1")
            .unwrap();
        assert_eq!(session.ledger().len(), 2);

        let note = session
            .change_serving_size(&home, &catalog, pos(0, 0), MealType::Dinner, 4)
            .unwrap();
        assert_eq!(note, SlotNote::PrepareNew { leftover: 0 });
        assert!(session.ledger().is_empty());

        session
            .change_serving_size(&home, &catalog, pos(0, 0), MealType::Dinner, 12)
            .unwrap();
        assert_eq!(session.ledger().len(), 2);
        let slot = session.calendar("H1").unwrap().slot(pos(0, 0), MealType::Dinner).unwrap();
        assert_eq!(slot.servings, Some(12));

        let err = session
            .change_serving_size(&home, &catalog, pos(0, 0), MealType::Dinner, 7)
            .unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));
    }

    #[test]
    fn test_change_serving_size_requires_meal() {
        let mut session = SessionState::new();
        let err = session
            .change_serving_size(&sample_home(), &sample_catalog(), pos(1, 1), MealType::Dinner, 4)
            .unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));
    }

    #[test]
    fn test_prepare_home_only_once() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();
        let options = AutofillOptions::default();

        assert!(session.prepare_home(&home, &catalog, &options).unwrap());
        assert!(!session.prepare_home(&home, &catalog, &options).unwrap());
        assert_eq!(session.calendar("H1").unwrap().planned_count(), 28);

        assert!(session.reset_home("H1"));
        assert!(session.ledger().is_empty());
        assert!(!session.reset_home("H1"));
    }

    fn dinner_note(session: &SessionState, at: GridPos) -> Option<SlotNote> {
        session
            .calendar("H1")
            .and_then(|c| c.slot(at, MealType::Dinner))
            .and_then(|s| s.note)
    }

    #[test]
    fn test_shrinking_batch_replans_cells_eating_from_it() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();

        session
            .assign_meal(&home, &catalog, pos(0, 5), MealType::Dinner, "d1")
            .unwrap();
        session
            .assign_meal(&home, &catalog, pos(0, 6), MealType::Dinner, "d2")
            .unwrap();

        session
            .change_serving_size(&home, &catalog, pos(0, 5), MealType::Dinner, 4)
            .unwrap();

        // No surplus is left, so the next day cooks its own Tacos.
        assert_eq!(
            dinner_note(&session, pos(0, 6)),
            Some(SlotNote::PrepareNew { leftover: 0 })
        );
        let slot = session.calendar("H1").unwrap().slot(pos(0, 6), MealType::Dinner).unwrap();
        assert_eq!(slot.meal_id.as_deref(), Some("d2"));
        assert_eq!(slot.servings, Some(4));
    }

    #[test]
    fn test_growing_batch_lets_cells_retake_leftovers() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();

        session
            .assign_meal(&home, &catalog, pos(0, 5), MealType::Dinner, "d1")
            .unwrap();
        session
            .assign_meal(&home, &catalog, pos(0, 6), MealType::Dinner, "d2")
            .unwrap();

        // 12 for 4 residents covers the next two days in full.
        session
            .change_serving_size(&home, &catalog, pos(0, 5), MealType::Dinner, 12)
            .unwrap();

        assert_eq!(
            dinner_note(&session, pos(0, 6)),
            Some(SlotNote::UseLeftovers {
                servings: 4,
                source: pos(0, 5)
            })
        );
        assert!(session.ledger().get("H1", pos(0, 6), MealType::Dinner).is_none());
        assert_eq!(session.ledger().get("H1", pos(1, 0), MealType::Dinner).unwrap().servings, 4);
    }

    #[test]
    fn test_reassigning_source_replans_cells_eating_from_it() {
        let mut session = SessionState::new();
        let home = sample_home();
        let catalog = sample_catalog();

        session
            .assign_meal(&home, &catalog, pos(0, 5), MealType::Dinner, "d1")
            .unwrap();
        session
            .assign_meal(&home, &catalog, pos(0, 6), MealType::Dinner, "d2")
            .unwrap();

        // Tacos make exactly 4, so nothing carries to the next day anymore.
        let note = session
            .assign_meal(&home, &catalog, pos(0, 5), MealType::Dinner, "d2")
            .unwrap();
        assert_eq!(note, SlotNote::PrepareNew { leftover: 0 });
        assert_eq!(
            dinner_note(&session, pos(0, 6)),
            Some(SlotNote::PrepareNew { leftover: 0 })
        );
        assert!(session.ledger().is_empty());
    }
}
