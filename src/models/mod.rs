mod calendar;
mod home;
mod instructions;
mod meal;

pub use calendar::{Calendar, DayPlan, GridPos, Slot, SlotNote, DAYS_PER_WEEK, WEEKS};
pub use home::{find_home, fuzzy_home_candidates, Home, HOME_MATCH_THRESHOLD};
pub use instructions::{Instructions, TierInstructions};
pub use meal::{Meal, MealCatalog, MealType};
