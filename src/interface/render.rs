use crate::ingest::PopularityEntry;
use crate::models::{Calendar, GridPos, Home, MealCatalog, MealType, DAYS_PER_WEEK, WEEKS};
use crate::planner::{LeftoverLedger, DAY_LABELS, NOT_SET};

/// Width of the longest popularity bar.
const CHART_WIDTH: usize = 40;

/// Display a home's calendar week by week.
pub fn display_calendar(home: &Home, calendar: Option<&Calendar>, catalog: &MealCatalog) {
    println!();
    println!("=== {} ({} residents) ===", home.name, home.residents);

    let Some(calendar) = calendar else {
        println!("No meals planned yet. Run 'plan' to auto-fill the calendar.");
        println!();
        return;
    };

    for week in 0..WEEKS {
        println!();
        println!("--- Week {} ---", week + 1);
        for day in 0..DAYS_PER_WEEK {
            let Ok(pos) = GridPos::new(week, day) else {
                continue;
            };
            println!("{} (Day {})", DAY_LABELS[day], week * DAYS_PER_WEEK + day + 1);
            for meal_type in MealType::ALL {
                let slot = calendar.slot(pos, meal_type);
                let name = slot
                    .and_then(|s| s.meal_id.as_deref())
                    .map(|id| catalog.display_name(meal_type, id))
                    .unwrap_or(NOT_SET);
                let servings = slot
                    .and_then(|s| s.servings)
                    .filter(|&n| n > 0)
                    .map(|n| format!(" ({} servings)", n))
                    .unwrap_or_default();
                let note = slot
                    .and_then(|s| s.note)
                    .map(|n| format!("  [{}]", n))
                    .unwrap_or_default();
                println!("  {:<10} {}{}{}", meal_type, name, servings, note);
            }
        }
    }

    println!();
    println!("Planned slots: {}", calendar.planned_count());
    println!();
}

/// Display leftover servings still waiting to be used for a home.
pub fn display_leftovers(home: &Home, ledger: &LeftoverLedger) {
    let entries: Vec<_> = ledger.entries_for_home(&home.id).collect();
    if entries.is_empty() {
        println!("No unused leftovers.");
        return;
    }

    println!("=== Unused leftovers ({}) ===", entries.len());
    for (key, entry) in entries {
        println!(
            "  {} {:<10} {} servings (from {})",
            key.pos, key.meal_type, entry.servings, entry.source
        );
    }
    println!();
}

/// Horizontal bar chart of the most served meals.
pub fn display_popularity(entries: &[PopularityEntry]) {
    if entries.is_empty() {
        println!("No meal columns found. Add Meal* columns to the spreadsheet to see popularity.");
        return;
    }

    println!();
    println!("=== Most Popular Meals ===");
    println!();

    let max_name_len = entries.iter().map(|e| e.name.len()).max().unwrap_or(10);
    let max_count = entries.iter().map(|e| e.count).max().unwrap_or(1).max(1);

    for entry in entries {
        let bar_len = (entry.count as usize * CHART_WIDTH).div_ceil(max_count as usize);
        println!(
            "{:<width$} | {} {} ({:.1}%)",
            entry.name,
            "#".repeat(bar_len),
            entry.count,
            entry.share * 100.0,
            width = max_name_len
        );
    }
    println!();
}

/// Display the loaded homes.
pub fn display_homes(homes: &[Home]) {
    if homes.is_empty() {
        println!("Homes: (none)");
        return;
    }

    println!();
    println!("=== Homes ({}) ===", homes.len());
    for home in homes {
        let restrictions = if home.dietary_restrictions.is_empty() {
            String::new()
        } else {
            format!(", restrictions: {}", home.dietary_restrictions.join(", "))
        };
        println!(
            "  {} - {} ({} residents{})",
            home.id, home.name, home.residents, restrictions
        );
    }
    println!();
}
