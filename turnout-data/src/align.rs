//! Canonical day-label axis shared by every year on a chart.
//!
//! Years have different numbers of early-voting days, so series are aligned
//! by early-voting day number instead of calendar date: the k-th early-voting
//! day of any year lands on `"Day k"`, and election day always lands on
//! `"Election Day"`. Positions a series never reaches stay `None` and render
//! as a gap.

use turnout_core::DateColumn;

pub const ELECTION_DAY_LABEL: &str = "Election Day";

pub fn day_label(day: usize) -> String {
    format!("Day {}", day)
}

/// Ordered labels: `Day 1..=Day V`, then `Election Day` when shown.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAxis {
    labels: Vec<String>,
    visible_early_voting_days: usize,
    show_election_day: bool,
}

impl LabelAxis {
    pub fn new(visible_early_voting_days: usize, show_election_day: bool) -> LabelAxis {
        let mut labels = (1..=visible_early_voting_days)
            .map(day_label)
            .collect::<Vec<_>>();
        if show_election_day {
            labels.push(ELECTION_DAY_LABEL.to_string());
        }
        LabelAxis {
            labels,
            visible_early_voting_days,
            show_election_day,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn election_day_position(&self) -> Option<usize> {
        self.show_election_day
            .then_some(self.visible_early_voting_days)
    }

    /// Map one series onto the axis.
    ///
    /// `dates[i]` describes `values[i]`. The early-voting day counter is local
    /// to this series; days past the visible window are dropped.
    pub fn align(&self, dates: &[DateColumn], values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut aligned = vec![None; self.labels.len()];
        let mut early_day = 0;
        for (date, value) in dates.iter().zip(values) {
            let target = if date.is_election_day {
                self.election_day_position()
            } else {
                early_day += 1;
                (early_day <= self.visible_early_voting_days).then(|| early_day - 1)
            };
            if let Some(position) = target {
                aligned[position] = *value;
            }
        }
        aligned
    }
}
