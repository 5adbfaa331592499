mod catalog;
mod homes;

pub use catalog::{load_catalog, load_instructions};
pub use homes::{load_sheet, read_sheet, PopularityEntry, SheetData};
