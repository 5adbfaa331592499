use std::collections::{BTreeMap, BTreeSet};

use crate::models::{find_home, Home, Instructions, MealCatalog, TierInstructions};
use crate::planner::{serving_tier, UNCATEGORIZED};
use crate::state::SessionState;

/// Shopping items grouped by store category, both sorted.
pub type ShoppingList = BTreeMap<String, Vec<String>>;

/// Visit the instructions of every planned slot of every known home.
fn for_each_instruction<'a>(
    session: &SessionState,
    homes: &[Home],
    catalog: &MealCatalog,
    instructions: &'a Instructions,
    tiers: &[u32],
    mut visit: impl FnMut(&'a TierInstructions),
) {
    for (home_id, calendar) in session.calendars() {
        let Some(home) = find_home(homes, home_id) else {
            tracing::debug!(home = %home_id, "calendar for unknown home skipped");
            continue;
        };
        let tier = serving_tier(home.residents, tiers);

        for (_, meal_type, slot) in calendar.planned_slots() {
            let Some(meal_id) = slot.meal_id.as_deref() else {
                continue;
            };
            let name = catalog.display_name(meal_type, meal_id);
            if let Some(steps) = instructions.get(name, tier) {
                visit(steps);
            }
        }
    }
}

/// Split "Category, item text" into its parts.
fn split_item(item: &str) -> (String, String) {
    match item.split_once(',') {
        Some((category, rest)) => (category.trim().to_string(), rest.trim().to_string()),
        None => (UNCATEGORIZED.to_string(), item.trim().to_string()),
    }
}

/// Everything to buy for all planned menus, deduplicated and grouped.
pub fn compile_shopping_list(
    session: &SessionState,
    homes: &[Home],
    catalog: &MealCatalog,
    instructions: &Instructions,
    tiers: &[u32],
) -> ShoppingList {
    let mut items: BTreeSet<&str> = BTreeSet::new();
    for_each_instruction(session, homes, catalog, instructions, tiers, |steps| {
        items.extend(steps.shopping_list.iter().map(String::as_str));
    });

    let mut grouped = ShoppingList::new();
    for item in items {
        let (category, text) = split_item(item);
        if text.is_empty() {
            continue;
        }
        grouped.entry(category).or_default().push(text);
    }
    for entries in grouped.values_mut() {
        entries.sort();
        entries.dedup();
    }
    grouped
}

/// Every prep step for all planned menus, deduplicated and sorted.
pub fn compile_prep_list(
    session: &SessionState,
    homes: &[Home],
    catalog: &MealCatalog,
    instructions: &Instructions,
    tiers: &[u32],
) -> Vec<String> {
    let mut steps: BTreeSet<&str> = BTreeSet::new();
    for_each_instruction(session, homes, catalog, instructions, tiers, |tier_steps| {
        steps.extend(tier_steps.prep.iter().map(String::as_str));
    });
    steps.into_iter().map(str::to_string).collect()
}
