use dialoguer::{Confirm, Select};

use crate::error::{MenuError, Result};
use crate::models::{
    find_home, fuzzy_home_candidates, GridPos, Home, Meal, MealType, DAYS_PER_WEEK, WEEKS,
};
use crate::planner::DAY_LABELS;

/// What the interactive editor should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    AssignMeal,
    ChangeServings,
    ShowCalendar,
    ShowLeftovers,
    SaveAndQuit,
    Quit,
}

impl EditAction {
    const ALL: [EditAction; 6] = [
        EditAction::AssignMeal,
        EditAction::ChangeServings,
        EditAction::ShowCalendar,
        EditAction::ShowLeftovers,
        EditAction::SaveAndQuit,
        EditAction::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            EditAction::AssignMeal => "Assign a meal",
            EditAction::ChangeServings => "Change serving size",
            EditAction::ShowCalendar => "Show calendar",
            EditAction::ShowLeftovers => "Show unused leftovers",
            EditAction::SaveAndQuit => "Save and quit",
            EditAction::Quit => "Quit without saving",
        }
    }
}

/// Resolve a home from an id or name, offering fuzzy matches for typos.
pub fn prompt_home<'a>(homes: &'a [Home], query: &str) -> Result<&'a Home> {
    if let Some(home) = find_home(homes, query) {
        return Ok(home);
    }

    let candidates = fuzzy_home_candidates(homes, query);
    match candidates.as_slice() {
        [] => Err(MenuError::HomeNotFound(query.to_string())),
        [(home, _)] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}' ({})?", home.name, home.id))
                .default(true)
                .interact()?;
            if confirm {
                Ok(*home)
            } else {
                Err(MenuError::HomeNotFound(query.to_string()))
            }
        }
        many => {
            let options: Vec<String> = many
                .iter()
                .take(5)
                .map(|(h, _)| format!("{} ({})", h.name, h.id))
                .collect();
            let mut selection_options = options.clone();
            selection_options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which home did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            if selection < options.len() {
                Ok(many[selection].0)
            } else {
                Err(MenuError::HomeNotFound(query.to_string()))
            }
        }
    }
}

pub fn prompt_action() -> Result<EditAction> {
    let labels: Vec<&str> = EditAction::ALL.iter().map(|a| a.label()).collect();
    let selection = Select::new()
        .with_prompt("What next?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(EditAction::ALL[selection])
}

/// Pick a calendar cell.
pub fn prompt_grid_pos() -> Result<GridPos> {
    let weeks: Vec<String> = (1..=WEEKS).map(|w| format!("Week {}", w)).collect();
    let week = Select::new()
        .with_prompt("Week")
        .items(&weeks)
        .default(0)
        .interact()?;

    let days: Vec<String> = (0..DAYS_PER_WEEK)
        .map(|d| format!("{} (Day {})", DAY_LABELS[d], week * DAYS_PER_WEEK + d + 1))
        .collect();
    let day = Select::new()
        .with_prompt("Day")
        .items(&days)
        .default(0)
        .interact()?;

    GridPos::new(week, day)
}

pub fn prompt_meal_type() -> Result<MealType> {
    let selection = Select::new()
        .with_prompt("Meal")
        .items(&MealType::ALL)
        .default(0)
        .interact()?;
    Ok(MealType::ALL[selection])
}

/// Pick one of the home's preferred meals; `None` if there are none.
pub fn prompt_meal<'a>(meals: &[&'a Meal]) -> Result<Option<&'a Meal>> {
    if meals.is_empty() {
        println!("This home has no preferred meals for that slot.");
        return Ok(None);
    }
    let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Select a meal")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(Some(meals[selection]))
}

/// Pick one of the meal's batch sizes.
pub fn prompt_servings(meal: &Meal) -> Result<Option<u32>> {
    if meal.servings.is_empty() {
        println!("{} has no serving sizes listed.", meal.name);
        return Ok(None);
    }
    let options: Vec<String> = meal
        .servings
        .iter()
        .map(|s| format!("{} servings", s))
        .collect();
    let selection = Select::new()
        .with_prompt(format!("Serving size for {}", meal.name))
        .items(&options)
        .default(0)
        .interact()?;
    Ok(Some(meal.servings[selection]))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
