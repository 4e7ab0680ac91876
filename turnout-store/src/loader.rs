//! Writes into the store: load-state transitions and whole-year replacement.

use crate::{LoadState, Repository};
use std::rc::Rc;
use turnout_core::classify::ClassifyLocations;
use turnout_core::ingest::parse_year_csv;
use turnout_core::{ParseError, YearDataset};

impl Repository {
    /// Parse one year's export and swap it into the store.
    ///
    /// On a parse error the year is replaced with an empty dataset, marked
    /// failed, and the error is returned.
    pub fn load_year_csv(&self, year: &str, csv_data: &str) -> Result<(), ParseError> {
        match parse_year_csv(year, csv_data) {
            Ok(dataset) => {
                self.replace_year(dataset);
                Ok(())
            }
            Err(e) => {
                log::warn!("store: {} failed to parse: {}", year, e);
                self.replace_year(YearDataset::empty(year));
                self.mark_failed(year, &e.to_string());
                Err(e)
            }
        }
    }

    /// Replace a year's dataset wholesale and mark it loaded.
    ///
    /// Locations are reclassified against the new dataset's own dates.
    pub fn replace_year(&self, mut dataset: YearDataset) {
        dataset.classify_locations();
        let year = dataset.year.clone();
        let mut inner = self.inner.borrow_mut();
        log::info!(
            "store: {} {} ({} locations, {} days)",
            if inner.datasets.contains_key(&year) { "replaced" } else { "loaded" },
            year,
            dataset.locations.len(),
            dataset.dates.len()
        );
        inner.datasets.insert(year.clone(), Rc::new(dataset));
        inner.states.insert(year, LoadState::Loaded);
    }

    /// Record that a fetch for `year` is in flight.
    ///
    /// Any dataset already held for the year stays readable.
    pub fn mark_pending(&self, year: &str) {
        self.inner
            .borrow_mut()
            .states
            .insert(year.to_string(), LoadState::Pending);
    }

    pub fn mark_failed(&self, year: &str, reason: &str) {
        let mut inner = self.inner.borrow_mut();
        inner
            .datasets
            .entry(year.to_string())
            .or_insert_with(|| Rc::new(YearDataset::empty(year)));
        inner
            .states
            .insert(year.to_string(), LoadState::Failed(reason.to_string()));
    }
}
