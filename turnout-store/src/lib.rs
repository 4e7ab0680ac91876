//! In-memory store of parsed election turnout exports, keyed by year.
//!
//! Each year is fetched and parsed on its own, then swapped into the store in
//! one step. Readers take a [`Repository::snapshot`] and see either the
//! previous complete dataset for a year or the new one, never a partial parse.
//!
//! # Architecture
//!
//! - `Rc<RefCell<..>>` wrapper for interior mutability on a single thread
//! - One [`LoadState`] per year tracks pending, loaded and failed fetches
//! - Datasets are held behind `Rc` so snapshots are cheap to take
//!
//! # Usage
//!
//! ```rust
//! use turnout_store::{LoadState, Repository};
//!
//! let repo = Repository::new();
//! repo.mark_pending("2024");
//! repo.load_year_csv("2024", "Location,x,10/29/2024,*11/05/2024\nLibrary,,0,40\nTotal,,0,40\n").unwrap();
//!
//! assert_eq!(repo.load_state("2024"), Some(LoadState::Loaded));
//! assert_eq!(repo.is_election_day_only("Library"), Some(true));
//! assert_eq!(repo.is_election_day_only("Nowhere"), None);
//! ```

mod loader;
pub mod models;
mod queries;

pub use models::{LoadState, LocationClassification};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use turnout_core::YearDataset;

#[derive(Debug, Default)]
struct Inner {
    datasets: HashMap<String, Rc<YearDataset>>,
    states: HashMap<String, LoadState>,
}

/// Shared handle to the per-year datasets.
///
/// This struct is cheaply cloneable (via `Rc`); clones see the same data.
///
/// # Example
///
/// ```rust
/// use turnout_store::Repository;
///
/// let repo = Repository::new();
/// let view = repo.clone();
/// repo.load_year_csv("2022", "Location,x,*11/08/2022\nLibrary,,12\nTotal,,12\n").unwrap();
/// assert!(view.is_data_loaded("2022"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Repository {
    inner: Rc<RefCell<Inner>>,
}

impl Repository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
