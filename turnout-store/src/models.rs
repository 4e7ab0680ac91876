//! Per-year load state and classification rows returned by queries.

use serde::Serialize;

/// Where a year's export is in its fetch-then-parse sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "state", content = "reason")]
pub enum LoadState {
    Pending,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }
}

/// One location with its election-day-only flag in each loaded year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationClassification {
    pub name: String,
    /// `(year, is_election_day_only)` for every loaded year the location appears in.
    pub years: Vec<(String, bool)>,
}
