pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod interface;
pub mod lists;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{MenuError, Result};
pub use models::{Calendar, GridPos, Home, Meal, MealCatalog, MealType};
pub use state::SessionState;
