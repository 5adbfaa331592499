use std::path::{Path, PathBuf};

use clap::Parser;

use group_home_menu_rs::cli::{CellArgs, Cli, Command};
use group_home_menu_rs::config::PlannerConfig;
use group_home_menu_rs::error::Result;
use group_home_menu_rs::export::{
    menu_file_name, render_menu, render_prep_list, render_shopping_list, write_document,
};
use group_home_menu_rs::ingest::{load_catalog, load_instructions, load_sheet, SheetData};
use group_home_menu_rs::interface::{
    display_calendar, display_homes, display_leftovers, display_popularity, prompt_action,
    prompt_grid_pos, prompt_home, prompt_meal, prompt_meal_type, prompt_servings, prompt_yes_no,
    EditAction,
};
use group_home_menu_rs::lists::{compile_prep_list, compile_shopping_list};
use group_home_menu_rs::logging::init_tracing;
use group_home_menu_rs::planner::preferred_meals;
use group_home_menu_rs::state::{load_session, save_session};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Homes => cmd_homes(&config),
        Command::Plan { home, seed } => cmd_plan(&config, &home, seed),
        Command::Assign { cell, meal } => cmd_assign(&config, &cell, &meal),
        Command::Servings { cell, servings } => cmd_servings(&config, &cell, servings),
        Command::Edit { home } => cmd_edit(&config, &home),
        Command::Popularity => cmd_popularity(&config),
        Command::ShoppingList { output } => cmd_shopping_list(&config, output.as_deref()),
        Command::PrepList { output } => cmd_prep_list(&config, output.as_deref()),
        Command::Menu { home, output } => cmd_menu(&config, &home, output),
        Command::Reset { home, yes } => cmd_reset(&config, &home, yes),
    }
}

fn load_homes(config: &PlannerConfig) -> Result<SheetData> {
    load_sheet(&config.homes_path, config.popularity_top_n)
}

/// List homes from the spreadsheet.
fn cmd_homes(config: &PlannerConfig) -> Result<()> {
    let sheet = load_homes(config)?;
    display_homes(&sheet.homes);
    Ok(())
}

/// Auto-fill a home's calendar if it has none, then show it.
fn cmd_plan(config: &PlannerConfig, query: &str, seed: Option<u64>) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let mut session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, query)?;

    let mut options = config.autofill_options();
    if seed.is_some() {
        options.shuffle_seed = seed;
    }

    let generated = session.prepare_home(home, &catalog, &options)?;
    if generated {
        println!("Generated a 4-week menu for {}.", home.name);
        save_session(&config.session_path, &session)?;
    }

    display_calendar(home, session.calendar(&home.id), &catalog);
    display_leftovers(home, session.ledger());
    Ok(())
}

/// Assign one meal to a cell.
fn cmd_assign(config: &PlannerConfig, cell: &CellArgs, meal_id: &str) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let mut session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, &cell.home)?;
    let pos = cell.pos()?;

    let note = session.assign_meal(home, &catalog, pos, cell.meal_type, meal_id)?;
    save_session(&config.session_path, &session)?;

    println!(
        "{} {}: {} - {}",
        pos,
        cell.meal_type,
        catalog.display_name(cell.meal_type, meal_id),
        note
    );
    Ok(())
}

/// Change the serving size of a planned meal.
fn cmd_servings(config: &PlannerConfig, cell: &CellArgs, servings: u32) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let mut session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, &cell.home)?;
    let pos = cell.pos()?;

    let note = session.change_serving_size(home, &catalog, pos, cell.meal_type, servings)?;
    save_session(&config.session_path, &session)?;

    println!("{} {}: {} servings - {}", pos, cell.meal_type, servings, note);
    Ok(())
}

/// Interactive calendar editor.
fn cmd_edit(config: &PlannerConfig, query: &str) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let mut session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, query)?;

    display_calendar(home, session.calendar(&home.id), &catalog);

    let mut changed = false;
    loop {
        match prompt_action()? {
            EditAction::AssignMeal => {
                let meal_type = prompt_meal_type()?;
                let pos = prompt_grid_pos()?;
                let meals = preferred_meals(&catalog, home, meal_type, None);
                let Some(meal) = prompt_meal(&meals)? else {
                    continue;
                };
                match session.assign_meal(home, &catalog, pos, meal_type, &meal.id) {
                    Ok(note) => {
                        println!("{} {}: {} - {}", pos, meal_type, meal.name, note);
                        changed = true;
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            EditAction::ChangeServings => {
                let meal_type = prompt_meal_type()?;
                let pos = prompt_grid_pos()?;
                let planned = session
                    .calendar(&home.id)
                    .and_then(|c| c.slot(pos, meal_type))
                    .and_then(|s| s.meal_id.as_deref())
                    .and_then(|id| catalog.find(meal_type, id));
                let Some(meal) = planned else {
                    println!("No {} planned at {}.", meal_type, pos);
                    continue;
                };
                let Some(servings) = prompt_servings(meal)? else {
                    continue;
                };
                match session.change_serving_size(home, &catalog, pos, meal_type, servings) {
                    Ok(note) => {
                        println!("{} {}: {} servings - {}", pos, meal_type, servings, note);
                        changed = true;
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            EditAction::ShowCalendar => {
                display_calendar(home, session.calendar(&home.id), &catalog);
            }
            EditAction::ShowLeftovers => display_leftovers(home, session.ledger()),
            EditAction::SaveAndQuit => {
                if changed {
                    save_session(&config.session_path, &session)?;
                    println!("Session saved.");
                }
                return Ok(());
            }
            EditAction::Quit => {
                if changed && !prompt_yes_no("Discard unsaved changes?", false)? {
                    continue;
                }
                return Ok(());
            }
        }
    }
}

/// Chart meal popularity from the spreadsheet.
fn cmd_popularity(config: &PlannerConfig) -> Result<()> {
    let sheet = load_homes(config)?;
    display_popularity(&sheet.popularity);
    Ok(())
}

fn cmd_shopping_list(config: &PlannerConfig, output: Option<&Path>) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let instructions = load_instructions(&config.instructions_path)?;
    let session = load_session(&config.session_path)?;

    let list = compile_shopping_list(
        &session,
        &sheet.homes,
        &catalog,
        &instructions,
        &config.serving_tiers,
    );
    write_document(output, &render_shopping_list(&list))
}

fn cmd_prep_list(config: &PlannerConfig, output: Option<&Path>) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let instructions = load_instructions(&config.instructions_path)?;
    let session = load_session(&config.session_path)?;

    let steps = compile_prep_list(
        &session,
        &sheet.homes,
        &catalog,
        &instructions,
        &config.serving_tiers,
    );
    write_document(output, &render_prep_list(&steps))
}

/// Export a home's menu document.
fn cmd_menu(config: &PlannerConfig, query: &str, output: Option<PathBuf>) -> Result<()> {
    let sheet = load_homes(config)?;
    let catalog = load_catalog(&config.meals_path)?;
    let session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, query)?;

    if session.calendar(&home.id).is_none() {
        println!("{} has no planned meals yet; the menu will be empty.", home.name);
    }

    let menu = render_menu(home, session.calendar(&home.id), &catalog, &config.meal_times);
    let target = output.unwrap_or_else(|| menu_file_name(home));
    if target.as_os_str() == "-" {
        write_document(None, &menu)
    } else {
        write_document(Some(target.as_path()), &menu)?;
        println!("Menu written to {}", target.display());
        Ok(())
    }
}

/// Clear a home's calendar and leftovers.
fn cmd_reset(config: &PlannerConfig, query: &str, yes: bool) -> Result<()> {
    let sheet = load_homes(config)?;
    let mut session = load_session(&config.session_path)?;
    let home = prompt_home(&sheet.homes, query)?;

    if !yes && !prompt_yes_no(&format!("Clear the menu for {}?", home.name), false)? {
        return Ok(());
    }

    if session.reset_home(&home.id) {
        save_session(&config.session_path, &session)?;
        println!("Cleared the menu for {}.", home.name);
    } else {
        println!("{} has no menu to clear.", home.name);
    }
    Ok(())
}
