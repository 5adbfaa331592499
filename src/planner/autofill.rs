use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::models::{Calendar, GridPos, Home, Meal, MealCatalog, MealType, Slot, SlotNote};
use crate::planner::leftovers::{allocate, Allocation};

/// Knobs for automatic calendar filling.
#[derive(Debug, Clone, Default)]
pub struct AutofillOptions {
    /// Shuffle equally popular meals with this seed before rotating.
    pub shuffle_seed: Option<u64>,
}

/// A freshly filled calendar plus the surplus each batch produced.
#[derive(Debug, Clone)]
pub struct AutofillPlan {
    pub calendar: Calendar,
    pub allocations: Vec<Allocation>,
}

/// Catalog meals the home prefers for a slot, most popular first.
///
/// Ties keep catalog order unless a shuffle seed is given.
pub fn preferred_meals<'a>(
    catalog: &'a MealCatalog,
    home: &Home,
    meal_type: MealType,
    shuffle_seed: Option<u64>,
) -> Vec<&'a Meal> {
    let mut meals: Vec<&Meal> = catalog
        .meals(meal_type)
        .iter()
        .filter(|m| home.prefers(meal_type, &m.id))
        .collect();

    if let Some(seed) = shuffle_seed {
        // Offset per slot so breakfast, lunch and dinner don't share a shuffle.
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(meal_type as u64));
        meals.shuffle(&mut rng);
    }

    // Stable sort keeps the tie order established above.
    meals.sort_by_key(|m| Reverse(m.popularity.unwrap_or(0)));
    meals
}

/// Put `meal` in a slot as a freshly cooked batch of its default size.
///
/// Returns the surplus allocation for the caller to merge into its ledger.
pub fn prepare_fresh(
    slot: &mut Slot,
    meal: &Meal,
    residents: u32,
    pos: GridPos,
    meal_type: MealType,
) -> Result<Allocation> {
    prepare_batch(slot, meal, meal.default_servings(), residents, pos, meal_type)
}

/// Put `meal` in a slot as a freshly cooked batch of `servings`.
pub fn prepare_batch(
    slot: &mut Slot,
    meal: &Meal,
    servings: u32,
    residents: u32,
    pos: GridPos,
    meal_type: MealType,
) -> Result<Allocation> {
    let allocation = allocate(servings, residents, pos, meal_type)?;
    slot.meal_id = Some(meal.id.clone());
    slot.servings = Some(servings);
    slot.note = Some(SlotNote::PrepareNew {
        leftover: servings.saturating_sub(residents),
    });
    Ok(allocation)
}

/// Fill every cell of a new calendar by rotating through preferred meals.
///
/// Returns `None` when the home prefers no catalog meal at all.
pub fn autofill(
    home: &Home,
    catalog: &MealCatalog,
    options: &AutofillOptions,
) -> Result<Option<AutofillPlan>> {
    let mut calendar = Calendar::new();
    let mut allocations = Vec::new();
    let mut assigned = 0usize;

    for meal_type in MealType::ALL {
        let meals = preferred_meals(catalog, home, meal_type, options.shuffle_seed);
        if meals.is_empty() {
            tracing::debug!(home = %home.id, %meal_type, "no preferred meals, slot left empty");
            continue;
        }

        for (index, pos) in GridPos::all().enumerate() {
            let meal = meals[index % meals.len()];
            let Some(slot) = calendar.slot_mut(pos, meal_type) else {
                continue;
            };
            let allocation = prepare_fresh(slot, meal, home.residents, pos, meal_type)?;
            if !allocation.is_empty() {
                allocations.push(allocation);
            }
            assigned += 1;
        }
    }

    if assigned == 0 {
        return Ok(None);
    }

    tracing::info!(
        home = %home.id,
        slots = assigned,
        batches_with_leftovers = allocations.len(),
        "auto-filled calendar"
    );

    Ok(Some(AutofillPlan {
        calendar,
        allocations,
    }))
}
