use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::MenuError;

/// One of the three daily meal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All meal types in serving order.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(MenuError::InvalidInput(format!(
                "unknown meal type '{}' (expected breakfast, lunch or dinner)",
                other
            ))),
        }
    }
}

/// A meal from the static catalog.
///
/// `servings` lists the batch sizes the recipe can be prepared in; the first
/// entry is the default used when the meal is placed on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    pub name: String,

    #[serde(default, deserialize_with = "de_servings")]
    pub servings: Vec<u32>,

    #[serde(default)]
    pub popularity: Option<u32>,
}

impl Meal {
    /// Serving size used when the meal is first placed (0 if none listed).
    pub fn default_servings(&self) -> u32 {
        self.servings.first().copied().unwrap_or(0)
    }

    /// Whether `servings` is one of the listed batch sizes.
    pub fn offers_servings(&self, servings: u32) -> bool {
        self.servings.contains(&servings)
    }
}

/// Meals grouped by the slot they can fill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealCatalog {
    #[serde(default)]
    pub breakfast: Vec<Meal>,
    #[serde(default)]
    pub lunch: Vec<Meal>,
    #[serde(default)]
    pub dinner: Vec<Meal>,
}

impl MealCatalog {
    pub fn meals(&self, meal_type: MealType) -> &[Meal] {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
        }
    }

    pub fn find(&self, meal_type: MealType, id: &str) -> Option<&Meal> {
        self.meals(meal_type).iter().find(|m| m.id == id)
    }

    /// Display name for a meal id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, meal_type: MealType, id: &'a str) -> &'a str {
        self.find(meal_type, id).map(|m| m.name.as_str()).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.breakfast.len() + self.lunch.len() + self.dinner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Num(u64),
    Text(String),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => n.to_string(),
        NumOrText::Text(s) => s.trim().to_string(),
    })
}

fn de_servings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
    let raw: Vec<NumOrText> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            NumOrText::Num(n) => u32::try_from(n).ok(),
            NumOrText::Text(s) => s.trim().parse().ok(),
        })
        .collect())
}
