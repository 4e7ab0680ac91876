//! Chart shape, colours, title and footnote for an aligned dataset.
//!
//! [`render`] runs the whole pipeline: window statistics, visible-day
//! decision, per-series filtering, cumulative transform, alignment, and
//! finally presentation.

use crate::align::{LabelAxis, ELECTION_DAY_LABEL};
use crate::transform::{
    day_axis_series, is_location_grouped, location_axis_series, location_label, Selection,
    Series, Toggles, VisibleWindow,
};
use crate::window::{analyze_early_voting_window, WindowStats};
use crate::PipelineConfig;
use serde::Serialize;
use std::time::Instant;
use turnout_core::{Datasets, Registry};
use turnout_utils::text::format_readable_list;

/// Line colours, assigned in order to emitted series.
pub const PALETTE: [&str; 10] = [
    "#EC4899", // Pink-500
    "#8B5CF6", // Violet-500
    "#10B981", // Emerald-500
    "#F59E0B", // Amber-500
    "#3B82F6", // Blue-500
    "#EF4444", // Red-500
    "#6EE7B7", // Emerald-300
    "#F97316", // Orange-500
    "#6366F1", // Indigo-500
    "#06B6D4", // Cyan-500
];

pub const LOCATION_GROUPED_TITLE: &str = "Election Day Turnout by Location (Grouped by Year)";

/// Items shown by name in the selection summary before eliding.
const SUMMARY_MAX_ITEMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartShape {
    Line,
    /// A single election day value.
    Bar,
    /// Election day by location, one bar series per year.
    GroupedBar,
}

impl ChartShape {
    /// Underlying chart widget type.
    pub fn chart_type(&self) -> &'static str {
        match self {
            ChartShape::Line => "line",
            ChartShape::Bar | ChartShape::GroupedBar => "bar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: String,
}

/// Labels and series handed to the chart renderer.
///
/// Every series has exactly one value per label; `None` is a gap.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlignedDataset {
    pub labels: Vec<String>,
    pub series: Vec<AlignedSeries>,
}

impl AlignedDataset {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.is_empty()
    }
}

/// Everything one render cycle produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendered {
    pub dataset: AlignedDataset,
    pub shape: ChartShape,
    pub title: String,
    pub footnote: String,
    pub no_data: bool,
    pub window: WindowStats,
    pub visible: VisibleWindow,
    pub summary: String,
}

impl Rendered {
    fn no_data(summary: String, window: WindowStats, visible: VisibleWindow) -> Rendered {
        Rendered {
            dataset: AlignedDataset::default(),
            shape: ChartShape::Line,
            title: String::new(),
            footnote: String::new(),
            no_data: true,
            window,
            visible,
            summary,
        }
    }
}

/// What the caller should do with its existing chart widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartUpdate {
    /// Build a new widget.
    Recreate,
    /// Replace labels, series and title in place.
    Patch,
    /// Remove the widget and show the empty state.
    Clear,
}

impl ChartUpdate {
    pub fn between(previous: Option<&Rendered>, next: &Rendered) -> ChartUpdate {
        if next.no_data {
            return ChartUpdate::Clear;
        }
        match previous {
            Some(prev) if !prev.no_data && prev.shape.chart_type() == next.shape.chart_type() => {
                ChartUpdate::Patch
            }
            _ => ChartUpdate::Recreate,
        }
    }
}

/// Assign palette colours by emitted position.
pub fn paint(series: Vec<Series>, config: &PipelineConfig) -> Vec<AlignedSeries> {
    series
        .into_iter()
        .enumerate()
        .map(|(i, s)| AlignedSeries {
            label: s.label,
            values: s.values,
            color: config.color(i).to_string(),
        })
        .collect()
}

/// Bar for a lone per-day election day value, line otherwise.
pub fn select_shape(dataset: &AlignedDataset, toggles: &Toggles) -> ChartShape {
    let [only] = dataset.series.as_slice() else {
        return ChartShape::Line;
    };
    let mut points = only.values.iter().enumerate().filter(|(_, v)| v.is_some());
    let single = match (points.next(), points.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    };
    let on_election_day = single
        .and_then(|index| dataset.labels.get(index))
        .is_some_and(|label| label == ELECTION_DAY_LABEL);
    if on_election_day
        && !toggles.show_early_voting
        && toggles.show_election_day
        && !toggles.is_cumulative()
    {
        ChartShape::Bar
    } else {
        ChartShape::Line
    }
}

pub fn compose_title(dataset: &AlignedDataset, toggles: &Toggles) -> String {
    let base = if toggles.is_cumulative() {
        "Cumulative Turnout"
    } else {
        "Per-Day Turnout"
    };
    match dataset.series.as_slice() {
        [only] => format!("{} {}", only.label, base),
        _ => format!("Comparative {}", base),
    }
}

/// Footnote describing a truncated early-voting window, or empty.
pub fn compose_footnote(
    visible: &VisibleWindow,
    stats: &WindowStats,
    toggles: &Toggles,
    registry: &Registry,
) -> String {
    if toggles.include_extended_days || !visible.is_truncated() {
        return String::new();
    }
    let shown = visible.visible_early_voting_days;
    let hidden = visible.hidden_day_count;
    let extended = stats
        .outlier_years
        .iter()
        .filter(|o| o.early_voting_days > shown)
        .map(|o| format!("{} ({} days)", registry.display_name(&o.year), o.early_voting_days))
        .collect::<Vec<_>>();
    let year_details = if extended.is_empty() {
        String::new()
    } else {
        format!(" ({})", extended.join(", "))
    };
    format!(
        "Showing the first {} {} of early voting; {} {}. Enable \"Show full early voting period\" to view everything{}.",
        shown,
        if shown == 1 { "day" } else { "days" },
        hidden,
        if hidden == 1 { "day remains hidden" } else { "days remain hidden" },
        year_details
    )
}

fn summarize(registry: &Registry, years: &[String], locations: &[String]) -> String {
    let year_names = years
        .iter()
        .map(|y| registry.display_name(y))
        .collect::<Vec<_>>();
    let location_names = locations
        .iter()
        .map(|l| location_label(l))
        .collect::<Vec<_>>();
    format!(
        "{}: {}",
        format_readable_list(&year_names, SUMMARY_MAX_ITEMS),
        format_readable_list(&location_names, SUMMARY_MAX_ITEMS)
    )
}

/// Run the full pipeline for one selection and toggle state.
///
/// Total over its inputs: empty selections, unloaded years, and toggles that
/// exclude everything all yield a `no_data` result.
pub fn render<D: Datasets + ?Sized>(
    source: &D,
    registry: &Registry,
    selection: &Selection,
    toggles: &Toggles,
    config: &PipelineConfig,
) -> Rendered {
    let started = Instant::now();
    let mut years = selection.years.clone();
    registry.sort_years(&mut years);
    let summary = summarize(registry, &years, &selection.locations);

    if selection.is_empty_for(toggles) {
        log::info!("render: empty selection");
        return Rendered::no_data(summary, WindowStats::default(), VisibleWindow::default());
    }

    let rendered = if is_location_grouped(selection, toggles) {
        let (labels, series) = location_axis_series(source, &years, &selection.locations);
        if series.is_empty() {
            Rendered::no_data(summary, WindowStats::default(), VisibleWindow::default())
        } else {
            Rendered {
                dataset: AlignedDataset {
                    labels,
                    series: paint(series, config),
                },
                shape: ChartShape::GroupedBar,
                title: LOCATION_GROUPED_TITLE.to_string(),
                footnote: String::new(),
                no_data: false,
                window: WindowStats::default(),
                visible: VisibleWindow::default(),
                summary,
            }
        }
    } else {
        let stats = if toggles.show_early_voting {
            analyze_early_voting_window(&years, source)
        } else {
            WindowStats::default()
        };
        let visible = VisibleWindow::decide(&stats, toggles, config.fallback_early_voting_days);
        let axis = LabelAxis::new(visible.visible_early_voting_days, toggles.show_election_day);
        let series = day_axis_series(source, &years, &selection.locations, toggles, &axis);

        if series.is_empty() || axis.is_empty() {
            Rendered::no_data(summary, stats, visible)
        } else {
            let dataset = AlignedDataset {
                labels: axis.into_labels(),
                series: paint(series, config),
            };
            Rendered {
                shape: select_shape(&dataset, toggles),
                title: compose_title(&dataset, toggles),
                footnote: compose_footnote(&visible, &stats, toggles, registry),
                dataset,
                no_data: false,
                window: stats,
                visible,
                summary,
            }
        }
    };

    log::info!(
        "render: {} series over {} labels in {} ms",
        rendered.dataset.series.len(),
        rendered.dataset.labels.len(),
        started.elapsed().as_millis()
    );
    rendered
}
