use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Instructions, MealCatalog, MealType};

/// Load the meal catalog JSON (`{breakfast: [...], lunch: [...], dinner: [...]}`).
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<MealCatalog> {
    let content = fs::read_to_string(path)?;
    let catalog: MealCatalog = serde_json::from_str(&content)?;

    for meal_type in MealType::ALL {
        let meals = catalog.meals(meal_type);
        let unservable = meals.iter().filter(|m| m.servings.is_empty()).count();
        if unservable > 0 {
            tracing::warn!(%meal_type, count = unservable, "meals without serving sizes");
        }
    }
    tracing::info!(meals = catalog.len(), "loaded meal catalog");
    Ok(catalog)
}

/// Load per-meal shopping and prep instructions.
pub fn load_instructions<P: AsRef<Path>>(path: P) -> Result<Instructions> {
    let content = fs::read_to_string(path)?;
    let instructions: Instructions = serde_json::from_str(&content)?;
    tracing::info!(meals = instructions.len(), "loaded meal instructions");
    Ok(instructions)
}
