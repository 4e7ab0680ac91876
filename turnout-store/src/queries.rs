//! Read-only queries over the loaded years.

use crate::{LoadState, LocationClassification, Repository};
use std::collections::HashMap;
use std::rc::Rc;
use turnout_core::ingest::location_order;
use turnout_core::{DateColumn, SelectionResult, YearDataset};

impl Repository {
    /// Immutable view of every year currently held.
    pub fn snapshot(&self) -> HashMap<String, Rc<YearDataset>> {
        self.inner.borrow().datasets.clone()
    }

    pub fn load_state(&self, year: &str) -> Option<LoadState> {
        self.inner.borrow().states.get(year).cloned()
    }

    /// True when `year` holds a dataset with at least one date column.
    pub fn is_data_loaded(&self, year: &str) -> bool {
        self.inner
            .borrow()
            .datasets
            .get(year)
            .is_some_and(|ds| ds.is_loaded())
    }

    /// The subset of `years` whose fetch is still in flight, in the given order.
    pub fn pending_years(&self, years: &[String]) -> Vec<String> {
        let inner = self.inner.borrow();
        years
            .iter()
            .filter(|y| inner.states.get(*y).is_some_and(LoadState::is_pending))
            .cloned()
            .collect()
    }

    pub fn dates_for_year(&self, year: &str) -> Vec<DateColumn> {
        self.inner
            .borrow()
            .datasets
            .get(year)
            .map(|ds| ds.dates.clone())
            .unwrap_or_default()
    }

    pub fn selection(
        &self,
        year: &str,
        key: &str,
        show_early_voting: bool,
        show_election_day: bool,
    ) -> Option<SelectionResult> {
        self.inner
            .borrow()
            .datasets
            .get(year)?
            .selection(key, show_early_voting, show_election_day)
    }

    /// Sorted, de-duplicated names of every location in any loaded year.
    pub fn all_loaded_locations(&self) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut names = inner
            .datasets
            .values()
            .flat_map(|ds| ds.locations.iter().map(|loc| loc.name.clone()))
            .collect::<Vec<_>>();
        names.sort_by(|a, b| location_order(a, b));
        names.dedup();
        names
    }

    /// Election-day-only across loaded years.
    ///
    /// True only if the location is election-day-only in every loaded year it
    /// appears in; `None` when no loaded year has it.
    pub fn is_election_day_only(&self, name: &str) -> Option<bool> {
        let inner = self.inner.borrow();
        let mut flags = inner
            .datasets
            .values()
            .filter_map(|ds| ds.location(name))
            .map(|loc| loc.is_election_day_only)
            .peekable();
        flags.peek()?;
        Some(flags.all(|edo| edo))
    }

    pub fn is_election_day_only_in(&self, year: &str, name: &str) -> Option<bool> {
        self.inner
            .borrow()
            .datasets
            .get(year)?
            .location(name)
            .map(|loc| loc.is_election_day_only)
    }

    /// Per-year classification of every loaded location, years in `years` order.
    pub fn classify_locations(&self, years: &[String]) -> Vec<LocationClassification> {
        let inner = self.inner.borrow();
        self.all_loaded_locations()
            .into_iter()
            .map(|name| {
                let years = years
                    .iter()
                    .filter_map(|year| {
                        let loc = inner.datasets.get(year)?.location(&name)?;
                        Some((year.clone(), loc.is_election_day_only))
                    })
                    .collect();
                LocationClassification { name, years }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR_A: &str = "\
Location,x,10/29/2024,10/30/2024,*11/05/2024
Fire Station 12,,0,0,80
Central Library,,10,12,90
Total,,10,12,170
";

    const YEAR_B: &str = "\
Location,x,10/30/2022,*11/08/2022
Fire Station 12,,4,30
Westside Rec Center,,0,25
Total,,4,55
";

    fn repo() -> Repository {
        let repo = Repository::new();
        repo.load_year_csv("a", YEAR_A).unwrap();
        repo.load_year_csv("b", YEAR_B).unwrap();
        repo
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn locations_are_merged_and_sorted() {
        assert_eq!(
            repo().all_loaded_locations(),
            strings(&["Central Library", "Fire Station 12", "Westside Rec Center"])
        );
    }

    #[test]
    fn classification_is_per_year() {
        let repo = repo();
        assert_eq!(repo.is_election_day_only_in("a", "Fire Station 12"), Some(true));
        assert_eq!(repo.is_election_day_only_in("b", "Fire Station 12"), Some(false));
        assert_eq!(repo.is_election_day_only_in("b", "Central Library"), None);
        assert_eq!(repo.is_election_day_only("Fire Station 12"), Some(false));
        assert_eq!(repo.is_election_day_only("Westside Rec Center"), Some(true));
        assert_eq!(repo.is_election_day_only("Central Library"), Some(false));
        assert_eq!(repo.is_election_day_only("Nowhere"), None);

        let rows = repo.classify_locations(&strings(&["a", "b"]));
        assert_eq!(rows[1].name, "Fire Station 12");
        assert_eq!(
            rows[1].years,
            vec![("a".to_string(), true), ("b".to_string(), false)]
        );
    }

    #[test]
    fn selection_and_dates() {
        let repo = repo();
        assert_eq!(repo.dates_for_year("a").len(), 3);
        assert!(repo.dates_for_year("missing").is_empty());
        let total = repo.selection("a", "total", false, true).unwrap();
        assert_eq!(total.name, "Total Turnout");
        assert_eq!(total.data, vec![Some(170.0)]);
        assert!(repo.selection("missing", "total", true, true).is_none());
    }

    #[test]
    fn pending_years_preserve_order() {
        let repo = repo();
        repo.mark_pending("c");
        repo.mark_pending("a");
        assert_eq!(
            repo.pending_years(&strings(&["a", "b", "c", "d"])),
            strings(&["a", "c"])
        );
        // pending does not hide data already loaded
        assert!(repo.is_data_loaded("a"));
    }
}
