use serde::{Deserialize, Serialize};
use turnout_utils::dates::parse_column_date;

/// Prefix on a header cell marking the election day column.
pub const ELECTION_DAY_MARKER: char = '*';

/// One voting day column of a yearly export.
///
/// `day_index` is the 1-based position of the column among the date columns
/// of the source file. By file convention early-voting days come before
/// election day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateColumn {
    pub date: String,
    pub is_election_day: bool,
    pub day_index: usize,
}

impl DateColumn {
    /// Build a column from a raw header cell, stripping the election day marker.
    ///
    /// Returns `None` for a cell that is blank once trimmed and unmarked.
    pub fn from_header(cell: &str, day_index: usize) -> Option<DateColumn> {
        let trimmed = cell.trim();
        let is_election_day = trimmed.starts_with(ELECTION_DAY_MARKER);
        let date = trimmed
            .strip_prefix(ELECTION_DAY_MARKER)
            .unwrap_or(trimmed)
            .trim();
        if date.is_empty() {
            return None;
        }
        Some(DateColumn {
            date: date.to_string(),
            is_election_day,
            day_index,
        })
    }

    pub fn is_early_voting(&self) -> bool {
        !self.is_election_day
    }

    /// The column date as a calendar date, when the header is a recognizable date.
    pub fn calendar_date(&self) -> Option<chrono::NaiveDate> {
        parse_column_date(&self.date)
    }
}
