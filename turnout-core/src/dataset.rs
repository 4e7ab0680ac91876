use crate::date_column::DateColumn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// Reserved location key selecting the per-day totals row.
pub const TOTAL_TURNOUT_KEY: &str = "total";

/// Display name of the totals pseudo-location.
pub const TOTAL_TURNOUT_NAME: &str = "Total Turnout";

/// Turnout counts for one polling location in one year.
///
/// `data[i]` is the count recorded on `dates[i]` of the owning [`YearDataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSeries {
    pub name: String,
    pub data: Vec<f64>,
    pub is_election_day_only: bool,
}

/// Everything parsed from one year's export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearDataset {
    pub year: String,
    pub dates: Vec<DateColumn>,
    pub locations: Vec<LocationSeries>,
    pub totals: Vec<f64>,
}

/// A series restricted to the date columns the active toggles select.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub name: String,
    pub data: Vec<Option<f64>>,
    pub dates: Vec<DateColumn>,
    pub indices: Vec<usize>,
}

impl YearDataset {
    /// An empty dataset, used when a year's export is missing or unreadable.
    pub fn empty(year: &str) -> YearDataset {
        YearDataset {
            year: year.to_string(),
            ..Default::default()
        }
    }

    /// True when the export produced at least one date column.
    pub fn is_loaded(&self) -> bool {
        !self.dates.is_empty()
    }

    /// Number of early-voting columns in this year's export.
    pub fn early_voting_days(&self) -> usize {
        self.dates.iter().filter(|d| d.is_early_voting()).count()
    }

    pub fn location(&self, name: &str) -> Option<&LocationSeries> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    /// Resolve a location key (or [`TOTAL_TURNOUT_KEY`]) to its display name and counts.
    fn raw_series(&self, key: &str) -> Option<(&str, &[f64])> {
        if key == TOTAL_TURNOUT_KEY {
            if self.totals.is_empty() {
                return None;
            }
            return Some((TOTAL_TURNOUT_NAME, &self.totals));
        }
        self.location(key)
            .map(|loc| (loc.name.as_str(), loc.data.as_slice()))
    }

    /// Restrict a location's series to the early-voting and/or election day columns.
    ///
    /// Returns `None` when the location is unknown for this year or when no
    /// column matches the toggles.
    pub fn selection(
        &self,
        key: &str,
        show_early_voting: bool,
        show_election_day: bool,
    ) -> Option<SelectionResult> {
        let (name, data) = self.raw_series(key)?;
        if self.dates.is_empty() {
            return None;
        }
        let indices = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                (d.is_election_day && show_election_day)
                    || (!d.is_election_day && show_early_voting)
            })
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if indices.is_empty() {
            return None;
        }
        Some(SelectionResult {
            name: name.to_string(),
            data: indices.iter().map(|&i| data.get(i).copied()).collect(),
            dates: indices.iter().map(|&i| self.dates[i].clone()).collect(),
            indices,
        })
    }
}

/// Read access to parsed years, keyed by year.
pub trait Datasets {
    fn dataset(&self, year: &str) -> Option<&YearDataset>;
}

impl Datasets for HashMap<String, YearDataset> {
    fn dataset(&self, year: &str) -> Option<&YearDataset> {
        self.get(year)
    }
}

impl Datasets for HashMap<String, Rc<YearDataset>> {
    fn dataset(&self, year: &str) -> Option<&YearDataset> {
        self.get(year).map(|d| d.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> YearDataset {
        let dates = vec![
            DateColumn::from_header("10/21/2024", 1).unwrap(),
            DateColumn::from_header("10/22/2024", 2).unwrap(),
            DateColumn::from_header("*11/05/2024", 3).unwrap(),
        ];
        YearDataset {
            year: "2024".to_string(),
            dates,
            locations: vec![LocationSeries {
                name: "Central Library".to_string(),
                data: vec![10.0, 20.0, 30.0],
                is_election_day_only: false,
            }],
            totals: vec![100.0, 200.0, 300.0],
        }
    }

    #[test]
    fn selection_keeps_requested_columns() {
        let ds = sample();
        let sel = ds.selection("Central Library", true, false).unwrap();
        assert_eq!(sel.indices, vec![0, 1]);
        assert_eq!(sel.data, vec![Some(10.0), Some(20.0)]);
        assert!(sel.dates.iter().all(|d| !d.is_election_day));

        let sel = ds.selection("Central Library", false, true).unwrap();
        assert_eq!(sel.indices, vec![2]);
        assert_eq!(sel.data, vec![Some(30.0)]);
    }

    #[test]
    fn total_key_reads_totals_row() {
        let ds = sample();
        let sel = ds.selection(TOTAL_TURNOUT_KEY, true, true).unwrap();
        assert_eq!(sel.name, TOTAL_TURNOUT_NAME);
        assert_eq!(sel.data, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn total_key_without_totals_is_none() {
        let mut ds = sample();
        ds.totals.clear();
        assert!(ds.selection(TOTAL_TURNOUT_KEY, true, true).is_none());
    }

    #[test]
    fn unknown_location_or_no_toggles_is_none() {
        let ds = sample();
        assert!(ds.selection("Nowhere", true, true).is_none());
        assert!(ds.selection("Central Library", false, false).is_none());
        assert!(YearDataset::empty("2024")
            .selection(TOTAL_TURNOUT_KEY, true, true)
            .is_none());
    }

    #[test]
    fn early_voting_days_counts_non_election_columns() {
        assert_eq!(sample().early_voting_days(), 2);
        assert_eq!(YearDataset::empty("x").early_voting_days(), 0);
    }
}
