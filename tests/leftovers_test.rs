use group_home_menu_rs::models::{GridPos, MealType, DAYS_PER_WEEK, WEEKS};
use group_home_menu_rs::planner::allocate;
use group_home_menu_rs::MenuError;

fn pos(week: usize, day: usize) -> GridPos {
    GridPos::new(week, day).unwrap()
}

#[test]
fn test_no_surplus_means_no_leftovers() {
    for residents in 1..=8 {
        for serving_size in 0..=residents {
            for start in GridPos::all() {
                let allocation = allocate(serving_size, residents, start, MealType::Lunch).unwrap();
                assert!(
                    allocation.is_empty(),
                    "{} servings for {} residents should leave nothing",
                    serving_size,
                    residents
                );
            }
        }
    }
}

#[test]
fn test_total_is_surplus_capped_by_remaining_days() {
    for residents in [1u32, 3, 4, 7] {
        for serving_size in [residents + 1, residents * 2 + 1, residents * 10, 500] {
            for start in GridPos::all() {
                let allocation =
                    allocate(serving_size, residents, start, MealType::Dinner).unwrap();
                let expected = (serving_size - residents)
                    .min(residents * start.days_remaining() as u32);
                assert_eq!(
                    allocation.total(),
                    expected,
                    "size {} residents {} from {}",
                    serving_size,
                    residents,
                    start
                );
            }
        }
    }
}

#[test]
fn test_entries_never_exceed_residents_or_leave_grid() {
    for start in GridPos::all() {
        let allocation = allocate(200, 6, start, MealType::Breakfast).unwrap();
        for (&cell, &servings) in &allocation.servings {
            assert!(servings > 0 && servings <= 6);
            assert!(cell.week() < WEEKS);
            assert!(cell.day() < DAYS_PER_WEEK);
            assert!(cell > start, "leftovers only move forward");
        }
    }
}

#[test]
fn test_entries_are_consecutive_days() {
    let allocation = allocate(30, 4, pos(1, 4), MealType::Dinner).unwrap();
    let cells: Vec<GridPos> = allocation.servings.keys().copied().collect();
    let mut expected = Vec::new();
    let mut cursor = pos(1, 4);
    for _ in 0..cells.len() {
        cursor = cursor.next().unwrap();
        expected.push(cursor);
    }
    assert_eq!(cells, expected);
    // 26 surplus: six full days of 4, then 2
    assert_eq!(cells.len(), 7);
    assert_eq!(allocation.servings[&cells[6]], 2);
}

#[test]
fn test_documented_examples() {
    let dinner = allocate(10, 4, pos(0, 5), MealType::Dinner).unwrap();
    assert_eq!(
        dinner.servings.into_iter().collect::<Vec<_>>(),
        vec![(pos(0, 6), 4), (pos(1, 0), 2)]
    );

    assert!(allocate(4, 4, pos(0, 0), MealType::Lunch).unwrap().is_empty());
    assert!(allocate(20, 4, pos(3, 6), MealType::Breakfast).unwrap().is_empty());
}

#[test]
fn test_zero_residents_rejected() {
    assert!(matches!(
        allocate(5, 0, pos(0, 0), MealType::Lunch),
        Err(MenuError::InvalidInput(_))
    ));
}
