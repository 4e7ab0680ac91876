//! Core types for election turnout exports.
//!
//! A yearly export is a CSV with one column per voting day and one row per
//! polling location. This crate parses those exports into [`YearDataset`]s,
//! classifies locations as election-day-only, and reads the registry that
//! maps a year key to its export file.

pub mod classify;
pub mod dataset;
pub mod date_column;
pub mod error;
#[cfg(feature = "api")]
pub mod fetch;
pub mod ingest;
pub mod registry;

pub use dataset::{Datasets, LocationSeries, SelectionResult, YearDataset, TOTAL_TURNOUT_KEY};
pub use date_column::DateColumn;
pub use error::{ParseError, RegistryError};
#[cfg(feature = "api")]
pub use error::FetchError;
pub use registry::{ElectionFile, Registry};
