use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lists::ShoppingList;
use crate::models::{Calendar, GridPos, Home, MealCatalog, MealType, DAYS_PER_WEEK, WEEKS};
use crate::planner::NOT_SET;

/// Default file name for a home's menu document.
pub fn menu_file_name(home: &Home) -> PathBuf {
    let stem: String = home
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    PathBuf::from(format!("{}-menu.txt", stem))
}

/// Printable 4-week menu for one home.
///
/// Meal ids are resolved to names here; a home without a calendar gets a
/// menu of empty slots.
pub fn render_menu(
    home: &Home,
    calendar: Option<&Calendar>,
    catalog: &MealCatalog,
    meal_times: &[String],
) -> String {
    let mut out = format!("{} Menu, {} residents\n", home.name, home.residents);

    if !home.dietary_restrictions.is_empty() {
        out.push_str(&format!(
            "Dietary Restrictions: {}\n",
            home.dietary_restrictions.join(", ")
        ));
    }
    out.push('\n');

    for time in meal_times {
        out.push_str(time);
        out.push('\n');
    }

    for week in 0..WEEKS {
        out.push_str(&format!("\nWeek {}\n", week + 1));
        for day in 0..DAYS_PER_WEEK {
            let Ok(pos) = GridPos::new(week, day) else {
                continue;
            };
            for (i, meal_type) in MealType::ALL.into_iter().enumerate() {
                let label = if i == 0 {
                    format!("Day {}", day + 1)
                } else {
                    String::new()
                };
                let name = calendar
                    .and_then(|c| c.slot(pos, meal_type))
                    .and_then(|s| s.meal_id.as_deref())
                    .map(|id| catalog.display_name(meal_type, id))
                    .unwrap_or(NOT_SET);
                out.push_str(&format!("  {:<8}{}\n", label, name));
            }
        }
    }
    out
}

/// Shopping list as text, one category heading per group.
pub fn render_shopping_list(list: &ShoppingList) -> String {
    let mut out = String::from("Shopping List\n");
    if list.is_empty() {
        out.push_str("\n(nothing to buy)\n");
        return out;
    }
    for (category, items) in list {
        out.push_str(&format!("\n{}\n", category));
        for item in items {
            out.push_str(&format!("  - {}\n", item));
        }
    }
    out
}

/// Prep instructions as a numbered list.
pub fn render_prep_list(steps: &[String]) -> String {
    let mut out = String::from("Prep Instructions\n\n");
    if steps.is_empty() {
        out.push_str("(no prep needed)\n");
        return out;
    }
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", i + 1, step));
    }
    out
}

/// Write a document to `path`, or to stdout when no path is given.
pub fn write_document(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "document written");
        }
        None => print!("{}", content),
    }
    Ok(())
}
