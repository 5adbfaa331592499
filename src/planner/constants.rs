/// Batch sizes the instruction sheets are written for.
pub const DEFAULT_SERVING_TIERS: [u32; 4] = [4, 6, 8, 12];

/// Number of meals shown in the popularity chart.
pub const DEFAULT_POPULARITY_TOP_N: usize = 10;

/// Header prefix of spreadsheet columns that name a served meal.
pub const MEAL_COLUMN_PREFIX: &str = "Meal";

/// Category for shopping items without a "Category, item" prefix.
pub const UNCATEGORIZED: &str = "Miscellaneous";

/// Placeholder for an empty calendar slot.
pub const NOT_SET: &str = "Not set";

/// Daily schedule printed at the top of every menu.
pub const DEFAULT_MEAL_TIMES: [&str; 6] = [
    "8am Breakfast",
    "10am Snack",
    "12pm Lunch",
    "3pm Snack",
    "5pm Dinner",
    "7pm Snack",
];

/// Short day labels, Sunday first.
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Pick the instruction tier for a household size.
///
/// The smallest tier that feeds everyone, or the largest when none does.
pub fn serving_tier(residents: u32, tiers: &[u32]) -> u32 {
    let mut sorted: Vec<u32> = tiers.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .copied()
        .find(|&t| t >= residents)
        .or_else(|| sorted.last().copied())
        .unwrap_or(residents)
}
