use crate::dataset::{LocationSeries, YearDataset};
use crate::date_column::DateColumn;

/// True when no early-voting column of `data` holds a positive count.
///
/// Missing entries count as zero, so a location without any early-voting
/// columns at all is election-day-only.
pub fn is_election_day_only(dates: &[DateColumn], data: &[f64]) -> bool {
    !dates
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_early_voting())
        .any(|(i, _)| data.get(i).is_some_and(|v| *v > 0.0))
}

/// Recompute the election-day-only flag of every location in a year.
pub trait ClassifyLocations {
    fn classify_locations(&mut self);
}

impl ClassifyLocations for YearDataset {
    fn classify_locations(&mut self) {
        let dates = &self.dates;
        for location in &mut self.locations {
            location.is_election_day_only = is_election_day_only(dates, &location.data);
        }
    }
}

impl LocationSeries {
    pub fn new(name: &str, data: Vec<f64>, dates: &[DateColumn]) -> LocationSeries {
        let is_election_day_only = is_election_day_only(dates, &data);
        LocationSeries {
            name: name.to_string(),
            data,
            is_election_day_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> Vec<DateColumn> {
        ["10/21/2024", "10/22/2024", "*11/05/2024"]
            .iter()
            .enumerate()
            .filter_map(|(i, h)| DateColumn::from_header(h, i + 1))
            .collect()
    }

    #[test]
    fn zero_early_voting_is_election_day_only() {
        assert!(is_election_day_only(&dates(), &[0.0, 0.0, 412.0]));
    }

    #[test]
    fn any_early_vote_clears_the_flag() {
        assert!(!is_election_day_only(&dates(), &[0.0, 3.0, 412.0]));
    }

    #[test]
    fn all_zero_location_is_election_day_only() {
        assert!(is_election_day_only(&dates(), &[0.0, 0.0, 0.0]));
    }

    #[test]
    fn short_data_treats_missing_as_zero() {
        assert!(is_election_day_only(&dates(), &[]));
    }

    #[test]
    fn classification_is_per_year() {
        let mut year_x = YearDataset {
            year: "x".to_string(),
            dates: dates(),
            locations: vec![LocationSeries {
                name: "Fire Station 4".to_string(),
                data: vec![0.0, 0.0, 90.0],
                is_election_day_only: false,
            }],
            totals: vec![],
        };
        let mut year_y = year_x.clone();
        year_y.year = "y".to_string();
        year_y.locations[0].data = vec![12.0, 8.0, 90.0];
        year_y.locations[0].is_election_day_only = true;

        year_x.classify_locations();
        year_y.classify_locations();

        assert!(year_x.locations[0].is_election_day_only);
        assert!(!year_y.locations[0].is_election_day_only);
    }
}
