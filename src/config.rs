use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::planner::{
    AutofillOptions, DEFAULT_MEAL_TIMES, DEFAULT_POPULARITY_TOP_N, DEFAULT_SERVING_TIERS,
};

/// Planner settings, read from an optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// CSV export of the residents spreadsheet.
    pub homes_path: PathBuf,
    pub meals_path: PathBuf,
    pub instructions_path: PathBuf,
    /// Where calendars and leftovers are kept between runs.
    pub session_path: PathBuf,
    pub serving_tiers: Vec<u32>,
    pub meal_times: Vec<String>,
    pub popularity_top_n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            homes_path: PathBuf::from("homes.csv"),
            meals_path: PathBuf::from("meals.json"),
            instructions_path: PathBuf::from("instructions.json"),
            session_path: PathBuf::from("menu_session.json"),
            serving_tiers: DEFAULT_SERVING_TIERS.to_vec(),
            meal_times: DEFAULT_MEAL_TIMES.iter().map(|s| s.to_string()).collect(),
            popularity_top_n: DEFAULT_POPULARITY_TOP_N,
            shuffle_seed: None,
        }
    }
}

impl PlannerConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.serving_tiers.is_empty() || self.serving_tiers.contains(&0) {
            return Err(MenuError::InvalidInput(
                "serving_tiers must list positive batch sizes".to_string(),
            ));
        }
        Ok(())
    }

    pub fn autofill_options(&self) -> AutofillOptions {
        AutofillOptions {
            shuffle_seed: self.shuffle_seed,
        }
    }
}
