use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::MealType;

/// Number of weeks in a planning grid.
pub const WEEKS: usize = 4;

/// Days per grid week.
pub const DAYS_PER_WEEK: usize = 7;

/// A cell position in the 4-week grid.
///
/// Deserialization goes through [`GridPos::new`], so loaded positions are
/// always inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridPos")]
pub struct GridPos {
    week: usize,
    day: usize,
}

#[derive(Deserialize)]
struct RawGridPos {
    week: usize,
    day: usize,
}

impl TryFrom<RawGridPos> for GridPos {
    type Error = MenuError;

    fn try_from(raw: RawGridPos) -> Result<Self> {
        GridPos::new(raw.week, raw.day)
    }
}

impl GridPos {
    /// Checked constructor; rejects positions outside the grid.
    pub fn new(week: usize, day: usize) -> Result<Self> {
        if week >= WEEKS || day >= DAYS_PER_WEEK {
            return Err(MenuError::InvalidInput(format!(
                "grid position week {} day {} is outside the {}x{} calendar",
                week, day, WEEKS, DAYS_PER_WEEK
            )));
        }
        Ok(Self { week, day })
    }

    pub fn week(self) -> usize {
        self.week
    }

    pub fn day(self) -> usize {
        self.day
    }

    /// The following day, wrapping into the next week; `None` past the grid.
    pub fn next(self) -> Option<GridPos> {
        let (week, day) = if self.day + 1 >= DAYS_PER_WEEK {
            (self.week + 1, 0)
        } else {
            (self.week, self.day + 1)
        };
        (week < WEEKS).then_some(GridPos { week, day })
    }

    /// Cells after this one until the end of the grid.
    pub fn days_remaining(self) -> usize {
        WEEKS * DAYS_PER_WEEK - 1 - (self.week * DAYS_PER_WEEK + self.day)
    }

    /// Every cell in calendar order.
    pub fn all() -> impl Iterator<Item = GridPos> {
        (0..WEEKS).flat_map(|week| (0..DAYS_PER_WEEK).map(move |day| GridPos { week, day }))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} day {}", self.week + 1, self.day + 1)
    }
}

/// Preparation note attached to a planned slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotNote {
    /// Cook a fresh batch; `leftover` servings carry forward.
    PrepareNew { leftover: u32 },
    /// Serve surplus from the batch cooked at `source` instead of cooking.
    UseLeftovers { servings: u32, source: GridPos },
}

impl fmt::Display for SlotNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotNote::PrepareNew { leftover: 0 } => write!(f, "Prepare new meal"),
            SlotNote::PrepareNew { leftover } => {
                write!(f, "Prepare new meal ({} servings will be left)", leftover)
            }
            SlotNote::UseLeftovers { servings, .. } => write!(f, "Use {} leftover servings", servings),
        }
    }
}

/// One meal slot of a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<SlotNote>,
}

impl Slot {
    pub fn is_set(&self) -> bool {
        self.meal_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub breakfast: Slot,
    pub lunch: Slot,
    pub dinner: Slot,
}

impl DayPlan {
    pub fn slot(&self, meal_type: MealType) -> &Slot {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
        }
    }

    pub fn slot_mut(&mut self, meal_type: MealType) -> &mut Slot {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
        }
    }
}

/// Fixed-shape 4-week by 7-day menu for one home.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    weeks: [[DayPlan; DAYS_PER_WEEK]; WEEKS],
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, pos: GridPos) -> Option<&DayPlan> {
        self.weeks.get(pos.week)?.get(pos.day)
    }

    pub fn day_mut(&mut self, pos: GridPos) -> Option<&mut DayPlan> {
        self.weeks.get_mut(pos.week)?.get_mut(pos.day)
    }

    pub fn slot(&self, pos: GridPos, meal_type: MealType) -> Option<&Slot> {
        self.day(pos).map(|d| d.slot(meal_type))
    }

    pub fn slot_mut(&mut self, pos: GridPos, meal_type: MealType) -> Option<&mut Slot> {
        self.day_mut(pos).map(|d| d.slot_mut(meal_type))
    }

    /// Days of one week, `None` for a week outside the grid.
    pub fn week(&self, week: usize) -> Option<&[DayPlan; DAYS_PER_WEEK]> {
        self.weeks.get(week)
    }

    /// All set slots as (position, meal type, slot).
    pub fn planned_slots(&self) -> impl Iterator<Item = (GridPos, MealType, &Slot)> {
        GridPos::all().flat_map(move |pos| {
            MealType::ALL.into_iter().filter_map(move |meal_type| {
                self.slot(pos, meal_type)
                    .filter(|s| s.is_set())
                    .map(|s| (pos, meal_type, s))
            })
        })
    }

    pub fn planned_count(&self) -> usize {
        self.planned_slots().count()
    }

    /// Cells of `meal_type` serving leftovers from the batch cooked at `source`.
    pub fn leftover_consumers(&self, meal_type: MealType, source: GridPos) -> Vec<GridPos> {
        GridPos::all()
            .filter(|&pos| {
                matches!(
                    self.slot(pos, meal_type).and_then(|s| s.note),
                    Some(SlotNote::UseLeftovers { source: from, .. }) if from == source
                )
            })
            .collect()
    }
}
