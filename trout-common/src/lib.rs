///! Shared lake data types for the trout lakes workspace
///!
///! ## Main Components
///! - `LakeRecord`: one parsed stocking event (ingestion-boundary types)
///! - `DateWindow` / `DateTotal`: time filtering and per-day aggregation
///! - `parse`: string-encoded field parsing ("Jan 05, 2024", "1,234")
///! - `aggregate`: totals by date, derby lake set, centroid

pub mod types;
pub mod parse;
pub mod aggregate;
mod error;

pub use error::ParseError;
pub use types::{DateTotal, DateWindow, LakeRecord, RawLake};
pub use aggregate::{centroid, derby_lake_set, latest_date, totals_by_date, within_window};
