use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::{MenuError, Result};
use crate::models::Home;
use crate::planner::MEAL_COLUMN_PREFIX;

/// Homes and meal popularity read from one residents spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub homes: Vec<Home>,
    pub popularity: Vec<PopularityEntry>,
}

/// How often a meal appears across the spreadsheet's meal columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityEntry {
    pub name: String,
    pub count: u32,
    /// Fraction of all counted meal cells.
    pub share: f64,
}

/// Column indexes resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    residents: Option<usize>,
    breakfast: Option<usize>,
    lunch: Option<usize>,
    dinner: Option<usize>,
    restrictions: Option<usize>,
    meals: Vec<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut columns = Columns::default();
        for (index, header) in headers.iter().enumerate() {
            let header = header.trim();
            match normalize(header).as_str() {
                "homeid" | "id" => columns.id = Some(index),
                "homename" | "name" => columns.name = Some(index),
                "residents" | "residentcount" => columns.residents = Some(index),
                "breakfastpreferences" => columns.breakfast = Some(index),
                "lunchpreferences" => columns.lunch = Some(index),
                "dinnerpreferences" => columns.dinner = Some(index),
                "dietaryrestrictions" => columns.restrictions = Some(index),
                _ => {}
            }
            if header.starts_with(MEAL_COLUMN_PREFIX) {
                columns.meals.push(index);
            }
        }

        if columns.id.is_none() || columns.residents.is_none() {
            return Err(MenuError::InvalidInput(
                "spreadsheet needs HomeID and Residents columns".to_string(),
            ));
        }
        Ok(columns)
    }
}

/// Lowercase and drop separators so `Home ID`, `home_id` and `HomeID` agree.
fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn cell<'a>(record: &'a csv::StringRecord, index: Option<usize>) -> &'a str {
    index.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

/// Split a comma separated cell into trimmed, non-empty items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the residents spreadsheet (CSV export of its first sheet).
pub fn read_sheet<R: Read>(reader: R, top_n: usize) -> Result<SheetData> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;

    let mut homes = Vec::new();
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = index + 2;

        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let id = cell(&record, columns.id);
        if id.is_empty() {
            return Err(MenuError::InvalidInput(format!("row {}: missing home id", line)));
        }

        let residents_raw = cell(&record, columns.residents);
        let residents: u32 = residents_raw
            .parse()
            .ok()
            .filter(|&r| r > 0)
            .ok_or_else(|| {
                MenuError::InvalidInput(format!(
                    "row {}: residents must be a positive whole number, got '{}'",
                    line, residents_raw
                ))
            })?;

        let name = cell(&record, columns.name);
        homes.push(Home {
            id: id.to_string(),
            name: if name.is_empty() { id.to_string() } else { name.to_string() },
            residents,
            breakfast_preferences: split_list(cell(&record, columns.breakfast)),
            lunch_preferences: split_list(cell(&record, columns.lunch)),
            dinner_preferences: split_list(cell(&record, columns.dinner)),
            dietary_restrictions: split_list(cell(&record, columns.restrictions)),
        });

        for &col in &columns.meals {
            let meal = cell(&record, Some(col));
            if meal.is_empty() {
                continue;
            }
            match positions.get(meal) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    positions.insert(meal.to_string(), counts.len());
                    counts.push((meal.to_string(), 1));
                }
            }
        }
    }

    let popularity = rank_popularity(counts, top_n);
    tracing::info!(
        homes = homes.len(),
        ranked_meals = popularity.len(),
        "read residents spreadsheet"
    );
    Ok(SheetData { homes, popularity })
}

/// Read the residents spreadsheet from a CSV file.
pub fn load_sheet<P: AsRef<Path>>(path: P, top_n: usize) -> Result<SheetData> {
    let file = File::open(path)?;
    read_sheet(file, top_n)
}

fn rank_popularity(counts: Vec<(String, u32)>, top_n: usize) -> Vec<PopularityEntry> {
    let total: u32 = counts.iter().map(|(_, c)| c).sum();
    let mut ranked = counts;
    // Stable: equal counts stay in order of first appearance.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(name, count)| PopularityEntry {
            share: if total > 0 { count as f64 / total as f64 } else { 0.0 },
            name,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
HomeID,HomeName,Residents,BreakfastPreferences,LunchPreferences,DinnerPreferences,DietaryRestrictions,Meal1,Meal2
H1,Maple House,4,\"b1,b2\",l1,\"d1, d2\",\"nut-free, low sodium\",Lasagna,Tacos
H2,Birch Cottage,6,b1,,d2,,Tacos,
";

    #[test]
    fn test_reads_homes() {
        let data = read_sheet(SHEET.as_bytes(), 10).unwrap();
        assert_eq!(data.homes.len(), 2);

        let maple = &data.homes[0];
        assert_eq!(maple.id, "H1");
        assert_eq!(maple.residents, 4);
        assert_eq!(maple.breakfast_preferences, vec!["b1", "b2"]);
        assert_eq!(maple.dinner_preferences, vec!["d1", "d2"]);
        assert_eq!(maple.dietary_restrictions, vec!["nut-free", "low sodium"]);

        let birch = &data.homes[1];
        assert!(birch.lunch_preferences.is_empty());
        assert!(birch.dietary_restrictions.is_empty());
    }

    #[test]
    fn test_popularity_counts_meal_columns() {
        let data = read_sheet(SHEET.as_bytes(), 10).unwrap();
        assert_eq!(data.popularity.len(), 2);
        assert_eq!(data.popularity[0].name, "Tacos");
        assert_eq!(data.popularity[0].count, 2);
        assert_eq!(data.popularity[1].name, "Lasagna");

        let top_one = read_sheet(SHEET.as_bytes(), 1).unwrap();
        assert_eq!(top_one.popularity.len(), 1);
    }

    #[test]
    fn test_snake_case_headers() {
        let sheet = "home_id,residents,dinner_preferences\nH9,3,d4\n";
        let data = read_sheet(sheet.as_bytes(), 10).unwrap();
        assert_eq!(data.homes[0].name, "H9");
        assert_eq!(data.homes[0].dinner_preferences, vec!["d4"]);
        assert!(data.popularity.is_empty());
    }

    #[test]
    fn test_rejects_bad_residents() {
        let sheet = "HomeID,Residents\nH1,0\n";
        let err = read_sheet(sheet.as_bytes(), 10).unwrap_err();
        assert!(err.to_string().contains("row 2"));

        let sheet = "HomeID,Residents\nH1,many\n";
        assert!(read_sheet(sheet.as_bytes(), 10).is_err());
    }

    #[test]
    fn test_rejects_missing_columns() {
        let sheet = "HomeName,Residents\nMaple,4\n";
        assert!(matches!(
            read_sheet(sheet.as_bytes(), 10),
            Err(MenuError::InvalidInput(_))
        ));
    }
}
