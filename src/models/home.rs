use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::MealType;

/// Minimum Jaro-Winkler similarity for a fuzzy home match.
pub const HOME_MATCH_THRESHOLD: f64 = 0.8;

/// A group home loaded from the residents spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub id: String,
    pub name: String,
    pub residents: u32,
    #[serde(default)]
    pub breakfast_preferences: Vec<String>,
    #[serde(default)]
    pub lunch_preferences: Vec<String>,
    #[serde(default)]
    pub dinner_preferences: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl Home {
    /// Preferred meal ids for a slot.
    pub fn preferences(&self, meal_type: MealType) -> &[String] {
        match meal_type {
            MealType::Breakfast => &self.breakfast_preferences,
            MealType::Lunch => &self.lunch_preferences,
            MealType::Dinner => &self.dinner_preferences,
        }
    }

    pub fn prefers(&self, meal_type: MealType, meal_id: &str) -> bool {
        self.preferences(meal_type).iter().any(|p| p == meal_id)
    }

    /// Whether `query` names this home exactly (id, or name ignoring case).
    pub fn matches_exactly(&self, query: &str) -> bool {
        let query = query.trim();
        self.id == query || self.name.to_lowercase() == query.to_lowercase()
    }
}

/// Find a home by exact id or case-insensitive name.
pub fn find_home<'a>(homes: &'a [Home], query: &str) -> Option<&'a Home> {
    homes
        .iter()
        .find(|h| h.id == query.trim())
        .or_else(|| homes.iter().find(|h| h.matches_exactly(query)))
}

/// Homes whose name resembles `query`, best match first.
pub fn fuzzy_home_candidates<'a>(homes: &'a [Home], query: &str) -> Vec<(&'a Home, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&Home, f64)> = homes
        .iter()
        .map(|h| {
            let by_name = jaro_winkler(&h.name.to_lowercase(), &query);
            let by_id = jaro_winkler(&h.id.to_lowercase(), &query);
            (h, by_name.max(by_id))
        })
        .filter(|(_, score)| *score > HOME_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}
