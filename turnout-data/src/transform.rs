//! Composition of user toggles into final per-(year, location) series.

use crate::align::LabelAxis;
use crate::window::WindowStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use turnout_core::dataset::TOTAL_TURNOUT_NAME;
use turnout_core::{Datasets, TOTAL_TURNOUT_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataPresentation {
    #[default]
    PerDay,
    Cumulative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayAs {
    #[default]
    Chart,
    Table,
}

impl FromStr for DataPresentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-day" | "perday" | "daily" => Ok(DataPresentation::PerDay),
            "cumulative" => Ok(DataPresentation::Cumulative),
            other => Err(format!("unknown data presentation '{}' (per-day, cumulative)", other)),
        }
    }
}

impl fmt::Display for DataPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataPresentation::PerDay => write!(f, "per-day"),
            DataPresentation::Cumulative => write!(f, "cumulative"),
        }
    }
}

impl FromStr for DisplayAs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(DisplayAs::Chart),
            "table" => Ok(DisplayAs::Table),
            other => Err(format!("unknown display '{}' (chart, table)", other)),
        }
    }
}

impl fmt::Display for DisplayAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayAs::Chart => write!(f, "chart"),
            DisplayAs::Table => write!(f, "table"),
        }
    }
}

/// The user's toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggles {
    pub show_early_voting: bool,
    pub show_election_day: bool,
    pub data_presentation: DataPresentation,
    pub display_as: DisplayAs,
    pub include_extended_days: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Toggles {
            show_early_voting: true,
            show_election_day: true,
            data_presentation: DataPresentation::PerDay,
            display_as: DisplayAs::Chart,
            include_extended_days: false,
        }
    }
}

impl Toggles {
    pub fn is_cumulative(&self) -> bool {
        self.data_presentation == DataPresentation::Cumulative
    }
}

/// Selected years (in any order) and locations (in display order).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub years: Vec<String>,
    pub locations: Vec<String>,
}

impl Selection {
    pub fn new(years: &[&str], locations: &[&str]) -> Selection {
        Selection {
            years: years.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True when nothing can be drawn regardless of the data.
    pub fn is_empty_for(&self, toggles: &Toggles) -> bool {
        self.years.is_empty()
            || self.locations.is_empty()
            || (!toggles.show_early_voting && !toggles.show_election_day)
    }
}

/// Chart label for a location key.
pub fn location_label(key: &str) -> &str {
    if key == TOTAL_TURNOUT_KEY {
        TOTAL_TURNOUT_NAME
    } else {
        key
    }
}

/// How many early-voting days the axis shows and how many it hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleWindow {
    pub total_early_voting_days: usize,
    pub visible_early_voting_days: usize,
    pub hidden_day_count: usize,
}

impl VisibleWindow {
    /// Decide the visible early-voting day count.
    ///
    /// With extended days included every day of the longest year is shown.
    /// Otherwise the window is the typical length, or `fallback_days` when
    /// no typical length is known, capped at the longest year.
    pub fn decide(stats: &WindowStats, toggles: &Toggles, fallback_days: usize) -> VisibleWindow {
        if !toggles.show_early_voting || stats.max_early_voting_days == 0 {
            return VisibleWindow::default();
        }
        let total = stats.max_early_voting_days;
        let visible = if toggles.include_extended_days {
            total
        } else {
            let typical = match stats.typical_early_voting_days {
                0 => fallback_days,
                typical => typical,
            };
            typical.max(1).min(total)
        };
        VisibleWindow {
            total_early_voting_days: total,
            visible_early_voting_days: visible,
            hidden_day_count: total - visible,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.hidden_day_count > 0
    }
}

/// Running total in chronological order.
///
/// Missing values add nothing; once summing starts the output never returns
/// to `None`.
pub fn cumulative(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .scan(0.0, |total, value| {
            *total += value.unwrap_or(0.0);
            Some(Some(*total))
        })
        .collect()
}

/// A labelled value series before colours are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn has_data(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }
}

/// Build one day-axis series per (year, location) pair.
///
/// Years are visited in the order given, locations in selection order.
/// Pairs with no selected points, or with nothing left after alignment, are
/// omitted.
pub fn day_axis_series<D: Datasets + ?Sized>(
    source: &D,
    years: &[String],
    locations: &[String],
    toggles: &Toggles,
    axis: &LabelAxis,
) -> Vec<Series> {
    let mut series = Vec::new();
    for year in years {
        let Some(dataset) = source.dataset(year) else {
            continue;
        };
        for location in locations {
            let Some(selection) =
                dataset.selection(location, toggles.show_early_voting, toggles.show_election_day)
            else {
                continue;
            };
            if selection.data.is_empty() {
                continue;
            }
            let values = if toggles.is_cumulative() {
                cumulative(&selection.data)
            } else {
                selection.data
            };
            let aligned = Series {
                label: format!("{} - {}", selection.name, year),
                values: axis.align(&selection.dates, &values),
            };
            if aligned.has_data() {
                series.push(aligned);
            } else {
                log::debug!("transform: dropping empty series {}", aligned.label);
            }
        }
    }
    series
}

/// True when the chart compares election day turnout across years, one bar
/// group per location.
pub fn is_location_grouped(selection: &Selection, toggles: &Toggles) -> bool {
    toggles.show_election_day
        && !toggles.show_early_voting
        && !toggles.is_cumulative()
        && selection.years.len() > 1
        && !selection.locations.is_empty()
}

/// Build the location-axis form: labels are the selected locations and each
/// year is one series of election day counts.
pub fn location_axis_series<D: Datasets + ?Sized>(
    source: &D,
    years: &[String],
    locations: &[String],
) -> (Vec<String>, Vec<Series>) {
    let labels = locations
        .iter()
        .map(|key| location_label(key).to_string())
        .collect::<Vec<_>>();
    let series = years
        .iter()
        .map(|year| Series {
            label: year.clone(),
            values: locations
                .iter()
                .map(|location| {
                    source
                        .dataset(year)
                        .and_then(|ds| ds.selection(location, false, true))
                        .and_then(|sel| sel.data.first().copied().flatten())
                })
                .collect(),
        })
        .filter(Series::has_data)
        .collect();
    (labels, series)
}
