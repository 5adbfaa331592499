use thiserror::Error;

use crate::models::MealType;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Home not found: {0}")]
    HomeNotFound(String),

    #[error("Meal not found: {id} is not a preferred {meal_type} meal")]
    MealNotFound { meal_type: MealType, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MenuError>;
