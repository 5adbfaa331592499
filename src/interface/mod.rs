pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_action, prompt_grid_pos, prompt_home, prompt_meal, prompt_meal_type, prompt_servings,
    prompt_yes_no, EditAction,
};
pub use render::{display_calendar, display_homes, display_leftovers, display_popularity};
