pub mod autofill;
pub mod constants;
pub mod leftovers;

pub use autofill::{
    autofill, preferred_meals, prepare_batch, prepare_fresh, AutofillOptions, AutofillPlan,
};
pub use constants::*;
pub use leftovers::{allocate, Allocation, LedgerEntry, LedgerKey, LedgerRecord, LeftoverLedger};
