use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Shopping and prep steps for one meal at one batch size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierInstructions {
    #[serde(rename = "shoppingList", default)]
    pub shopping_list: Vec<String>,
    #[serde(default)]
    pub prep: Vec<String>,
}

/// Instructions keyed by meal name, then serving tier (e.g. "4", "12").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(pub HashMap<String, HashMap<String, TierInstructions>>);

impl Instructions {
    pub fn get(&self, meal_name: &str, tier: u32) -> Option<&TierInstructions> {
        self.0.get(meal_name)?.get(&tier.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
