use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::{GridPos, MealType};

/// Surplus servings of one batch spread over the following days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub meal_type: MealType,
    /// Cell where the batch was prepared.
    pub source: GridPos,
    /// Servings available at each later cell of the same meal slot.
    pub servings: BTreeMap<GridPos, u32>,
}

impl Allocation {
    pub fn total(&self) -> u32 {
        self.servings.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.servings.is_empty()
    }
}

/// Spread the surplus of a batch forward, one day at a time.
///
/// Each following day of the same slot receives at most `resident_count`
/// servings. Surplus that would spill past the last grid week is dropped.
pub fn allocate(
    serving_size: u32,
    resident_count: u32,
    start: GridPos,
    meal_type: MealType,
) -> Result<Allocation> {
    if resident_count == 0 {
        return Err(MenuError::InvalidInput(
            "resident count must be positive to allocate leftovers".to_string(),
        ));
    }

    let mut servings = BTreeMap::new();
    let mut remaining = serving_size.saturating_sub(resident_count);
    let mut cursor = start;

    while remaining > 0 {
        let Some(next) = cursor.next() else {
            tracing::debug!(
                dropped = remaining,
                %start,
                %meal_type,
                "leftover servings run past the end of the grid"
            );
            break;
        };
        let used = remaining.min(resident_count);
        servings.insert(next, used);
        remaining -= used;
        cursor = next;
    }

    Ok(Allocation {
        meal_type,
        source: start,
        servings,
    })
}

/// Key of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerKey {
    pub home_id: String,
    pub pos: GridPos,
    pub meal_type: MealType,
}

impl LedgerKey {
    pub fn new(home_id: &str, pos: GridPos, meal_type: MealType) -> Self {
        Self {
            home_id: home_id.to_string(),
            pos,
            meal_type,
        }
    }
}

/// Leftover servings waiting at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub servings: u32,
    pub source: GridPos,
}

/// Flat form used to persist the ledger as a JSON list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub home_id: String,
    pub pos: GridPos,
    pub meal_type: MealType,
    pub servings: u32,
    pub source: GridPos,
}

/// Leftover servings available for reuse, per home, cell and meal slot.
///
/// Entries are single-use: [`LeftoverLedger::take`] removes what it returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LedgerRecord>", into = "Vec<LedgerRecord>")]
pub struct LeftoverLedger {
    entries: BTreeMap<LedgerKey, LedgerEntry>,
}

impl LeftoverLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allocation for a home. A later write to the same cell
    /// replaces the earlier one.
    pub fn merge(&mut self, home_id: &str, allocation: &Allocation) {
        for (&pos, &servings) in &allocation.servings {
            if servings == 0 {
                continue;
            }
            self.entries.insert(
                LedgerKey::new(home_id, pos, allocation.meal_type),
                LedgerEntry {
                    servings,
                    source: allocation.source,
                },
            );
        }
    }

    pub fn get(&self, home_id: &str, pos: GridPos, meal_type: MealType) -> Option<LedgerEntry> {
        self.entries
            .get(&LedgerKey::new(home_id, pos, meal_type))
            .copied()
    }

    /// Consume the entry for a cell.
    pub fn take(&mut self, home_id: &str, pos: GridPos, meal_type: MealType) -> Option<LedgerEntry> {
        self.entries.remove(&LedgerKey::new(home_id, pos, meal_type))
    }

    /// Drop unconsumed entries that came from the batch at `source`.
    ///
    /// Returns the number of servings withdrawn.
    pub fn withdraw_source(&mut self, home_id: &str, meal_type: MealType, source: GridPos) -> u32 {
        let mut withdrawn = 0;
        self.entries.retain(|key, entry| {
            let stale =
                key.home_id == home_id && key.meal_type == meal_type && entry.source == source;
            if stale {
                withdrawn += entry.servings;
            }
            !stale
        });
        withdrawn
    }

    /// Remove every entry belonging to a home.
    pub fn clear_home(&mut self, home_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.home_id != home_id);
        before - self.entries.len()
    }

    pub fn entries_for_home<'a>(
        &'a self,
        home_id: &'a str,
    ) -> impl Iterator<Item = (&'a LedgerKey, &'a LedgerEntry)> {
        self.entries.iter().filter(move |(k, _)| k.home_id == home_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<LedgerRecord>> for LeftoverLedger {
    fn from(records: Vec<LedgerRecord>) -> Self {
        let entries = records
            .into_iter()
            .filter(|r| r.servings > 0)
            .map(|r| {
                (
                    LedgerKey {
                        home_id: r.home_id,
                        pos: r.pos,
                        meal_type: r.meal_type,
                    },
                    LedgerEntry {
                        servings: r.servings,
                        source: r.source,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl From<LeftoverLedger> for Vec<LedgerRecord> {
    fn from(ledger: LeftoverLedger) -> Self {
        ledger
            .entries
            .into_iter()
            .map(|(key, entry)| LedgerRecord {
                home_id: key.home_id,
                pos: key.pos,
                meal_type: key.meal_type,
                servings: entry.servings,
                source: entry.source,
            })
            .collect()
    }
}
