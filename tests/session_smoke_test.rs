#[macro_use]
extern crate assert_float_eq;

use std::io::Write;

use tempfile::{tempdir, NamedTempFile};

use group_home_menu_rs::export::render_menu;
use group_home_menu_rs::ingest::{load_catalog, load_instructions, load_sheet};
use group_home_menu_rs::lists::{compile_prep_list, compile_shopping_list};
use group_home_menu_rs::models::{GridPos, MealType, SlotNote};
use group_home_menu_rs::planner::{AutofillOptions, DEFAULT_MEAL_TIMES, DEFAULT_SERVING_TIERS};
use group_home_menu_rs::state::{load_session, save_session};
use group_home_menu_rs::SessionState;

const SHEET: &str = "\
HomeID,HomeName,Residents,BreakfastPreferences,LunchPreferences,DinnerPreferences,DietaryRestrictions,Meal1,Meal2,Meal3
H1,Maple House,4,b1,l1,\"d1,d2\",nut-free,Lasagna,Tacos,Soup
H2,Birch Cottage,7,b1,,d2,,Tacos,Tacos,
";

const MEALS: &str = r#"{
    "breakfast": [{"id": "b1", "name": "Oatmeal", "servings": ["4", "8"], "popularity": 2}],
    "lunch": [{"id": "l1", "name": "Soup", "servings": ["4"]}],
    "dinner": [
        {"id": "d1", "name": "Lasagna", "servings": ["10", "12"], "popularity": 5},
        {"id": "d2", "name": "Tacos", "servings": ["8"], "popularity": 9}
    ]
}"#;

const INSTRUCTIONS: &str = r#"{
    "Lasagna": {"4": {"shoppingList": ["Dairy, Ricotta"], "prep": ["Boil noodles"]}},
    "Tacos": {
        "4": {"shoppingList": ["Meat, Ground beef 1 lb"], "prep": ["Brown beef"]},
        "8": {"shoppingList": ["Meat, Ground beef 2 lb"], "prep": ["Brown beef"]}
    },
    "Oatmeal": {"4": {"shoppingList": ["Pantry, Oats"]}}
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn pos(week: usize, day: usize) -> GridPos {
    GridPos::new(week, day).unwrap()
}

#[test]
fn test_popularity_from_sheet() {
    let sheet_file = write_temp(SHEET);
    let sheet = load_sheet(sheet_file.path(), 10).unwrap();

    assert_eq!(sheet.homes.len(), 2);
    assert_eq!(sheet.popularity[0].name, "Tacos");
    assert_eq!(sheet.popularity[0].count, 3);
    assert_float_absolute_eq!(sheet.popularity[0].share, 0.6, 1e-9);
    assert_float_absolute_eq!(sheet.popularity[1].share, 0.2, 1e-9);
}

#[test]
fn test_plan_assign_and_consume_leftovers() {
    let sheet = load_sheet(write_temp(SHEET).path(), 10).unwrap();
    let catalog = load_catalog(write_temp(MEALS).path()).unwrap();
    let maple = &sheet.homes[0];

    let mut session = SessionState::new();
    assert!(session.prepare_home(maple, &catalog, &AutofillOptions::default()).unwrap());

    let calendar = session.calendar("H1").unwrap();
    // Tacos are more popular, so they lead the dinner rotation.
    let first_dinner = calendar.slot(pos(0, 0), MealType::Dinner).unwrap();
    assert_eq!(first_dinner.meal_id.as_deref(), Some("d2"));
    assert_eq!(first_dinner.note, Some(SlotNote::PrepareNew { leftover: 4 }));
    assert_eq!(calendar.planned_count(), 84);

    // Auto-fill left Tacos surplus from day 5 waiting at day 6.
    let note = session
        .assign_meal(maple, &catalog, pos(0, 5), MealType::Dinner, "d1")
        .unwrap();
    assert_eq!(
        note,
        SlotNote::UseLeftovers {
            servings: 4,
            source: pos(0, 4)
        }
    );

    // Leftovers are gone, so Lasagna is cooked: 10 for 4 leaves 6,
    // day 7 gets 4 and week 2 day 1 gets 2.
    let note = session
        .assign_meal(maple, &catalog, pos(0, 5), MealType::Dinner, "d1")
        .unwrap();
    assert_eq!(note, SlotNote::PrepareNew { leftover: 6 });
    let entry = session.ledger().get("H1", pos(1, 0), MealType::Dinner).unwrap();
    assert_eq!(entry.servings, 2);
    assert_eq!(entry.source, pos(0, 5));

    let note = session
        .assign_meal(maple, &catalog, pos(1, 0), MealType::Dinner, "d2")
        .unwrap();
    assert_eq!(
        note,
        SlotNote::UseLeftovers {
            servings: 2,
            source: pos(0, 5)
        }
    );
    assert!(session.ledger().get("H1", pos(1, 0), MealType::Dinner).is_none());
}

#[test]
fn test_session_survives_save_and_reload() {
    let sheet = load_sheet(write_temp(SHEET).path(), 10).unwrap();
    let catalog = load_catalog(write_temp(MEALS).path()).unwrap();

    let mut session = SessionState::new();
    for home in &sheet.homes {
        session
            .prepare_home(home, &catalog, &AutofillOptions { shuffle_seed: Some(3) })
            .unwrap();
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    save_session(&path, &session).unwrap();
    let reloaded = load_session(&path).unwrap();

    assert_eq!(reloaded, session);
    assert_eq!(reloaded.ledger().len(), session.ledger().len());
}

#[test]
fn test_lists_and_menu_for_planned_homes() {
    let sheet = load_sheet(write_temp(SHEET).path(), 10).unwrap();
    let catalog = load_catalog(write_temp(MEALS).path()).unwrap();
    let instructions = load_instructions(write_temp(INSTRUCTIONS).path()).unwrap();

    let mut session = SessionState::new();
    for home in &sheet.homes {
        session
            .prepare_home(home, &catalog, &AutofillOptions::default())
            .unwrap();
    }

    let list = compile_shopping_list(
        &session,
        &sheet.homes,
        &catalog,
        &instructions,
        &DEFAULT_SERVING_TIERS,
    );
    // Maple (4 residents) uses tier 4, Birch (7) uses tier 8.
    assert_eq!(list["Meat"], vec!["Ground beef 1 lb", "Ground beef 2 lb"]);
    assert_eq!(list["Dairy"], vec!["Ricotta"]);
    assert_eq!(list["Pantry"], vec!["Oats"]);

    let prep = compile_prep_list(
        &session,
        &sheet.homes,
        &catalog,
        &instructions,
        &DEFAULT_SERVING_TIERS,
    );
    assert_eq!(prep, vec!["Boil noodles", "Brown beef"]);

    let meal_times: Vec<String> = DEFAULT_MEAL_TIMES.iter().map(|s| s.to_string()).collect();
    let menu = render_menu(&sheet.homes[0], session.calendar("H1"), &catalog, &meal_times);
    assert!(menu.starts_with("Maple House Menu, 4 residents\nDietary Restrictions: nut-free"));
    assert!(menu.contains("Tacos"));
    assert!(!menu.contains("d2"));
}
