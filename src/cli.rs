use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::{GridPos, MealType};

/// Group home menu planner: 4-week menus with leftover carryover, shopping
/// and prep lists.
#[derive(Parser, Debug)]
#[command(name = "group_home_menu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Planner settings (JSON). Missing file means defaults.
    #[arg(short, long, default_value = "menu_config.json")]
    pub config: PathBuf,

    /// Residents spreadsheet exported as CSV.
    #[arg(long)]
    pub homes: Option<PathBuf>,

    /// Meal catalog JSON.
    #[arg(long)]
    pub meals: Option<PathBuf>,

    /// Meal instructions JSON.
    #[arg(long)]
    pub instructions: Option<PathBuf>,

    /// Saved planning session.
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// More log output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Load the config file and apply path overrides from the command line.
    pub fn load_config(&self) -> Result<PlannerConfig> {
        let mut config = PlannerConfig::load(&self.config)?;
        if let Some(path) = &self.homes {
            config.homes_path = path.clone();
        }
        if let Some(path) = &self.meals {
            config.meals_path = path.clone();
        }
        if let Some(path) = &self.instructions {
            config.instructions_path = path.clone();
        }
        if let Some(path) = &self.session {
            config.session_path = path.clone();
        }
        Ok(config)
    }
}

/// A calendar cell as typed by the user (1-based).
#[derive(Args, Debug, Clone)]
pub struct CellArgs {
    /// Home id or name.
    #[arg(long)]
    pub home: String,

    /// Week number, 1-4.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub week: u8,

    /// Day number within the week, 1-7.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    pub day: u8,

    /// breakfast, lunch or dinner.
    #[arg(long = "meal-type")]
    pub meal_type: MealType,
}

impl CellArgs {
    pub fn pos(&self) -> Result<GridPos> {
        GridPos::new(usize::from(self.week) - 1, usize::from(self.day) - 1)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the homes in the spreadsheet.
    Homes,

    /// Auto-fill a home's calendar (if empty) and show it.
    Plan {
        /// Home id or name.
        #[arg(long)]
        home: String,

        /// Shuffle equally popular meals with this seed.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Put a meal in a calendar cell, using leftovers when available.
    Assign {
        #[command(flatten)]
        cell: CellArgs,

        /// Meal id from the catalog.
        #[arg(long)]
        meal: String,
    },

    /// Change the batch size of a planned meal.
    Servings {
        #[command(flatten)]
        cell: CellArgs,

        /// New serving count; must be one the meal offers.
        #[arg(long)]
        servings: u32,
    },

    /// Edit a home's calendar interactively.
    Edit {
        /// Home id or name.
        #[arg(long)]
        home: String,
    },

    /// Chart the most served meals from the spreadsheet.
    Popularity,

    /// Compile the shopping list for all planned menus.
    ShoppingList {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile prep instructions for all planned menus.
    PrepList {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a home's printable menu.
    Menu {
        /// Home id or name.
        #[arg(long)]
        home: String,

        /// Output file ("-" for stdout). Defaults to "<home name>-menu.txt".
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear a home's calendar and leftovers.
    Reset {
        /// Home id or name.
        #[arg(long)]
        home: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Homes
    }
}
