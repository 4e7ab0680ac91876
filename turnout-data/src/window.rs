//! Outlier-resistant estimate of the typical early-voting window.
//!
//! The count of early-voting days per selected year is summarized with
//! Tukey's upper fence, `Q3 + 1.5 * IQR`. The largest count inside the fence
//! is the typical window; years beyond it are outliers (e.g. a pandemic-era
//! extension) and are hidden from the default chart.

use serde::Serialize;
use turnout_core::Datasets;

/// Multiplier applied to the inter-quartile range for the upper fence.
pub const TUKEY_FENCE_MULTIPLIER: f64 = 1.5;

/// Linearly interpolated percentile of sorted values (the R-7 / Excel method).
///
/// `percentile` is in `0.0..=1.0`. Empty input yields `0.0`.
pub fn quantile(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }
    let position = (sorted.len() - 1) as f64 * percentile;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowEntry {
    pub year: String,
    pub early_voting_days: usize,
    pub total_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierYear {
    pub year: String,
    pub early_voting_days: usize,
}

/// Early-voting window statistics across a set of years.
///
/// The default value (all zero, no entries) means there is no basis for
/// truncation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub entries: Vec<WindowEntry>,
    pub typical_early_voting_days: usize,
    pub max_early_voting_days: usize,
    pub outlier_years: Vec<OutlierYear>,
}

impl WindowStats {
    /// True when at least one year contributed early-voting days.
    pub fn is_defined(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Compute the statistics from `(year, early_voting_days, total_days)` entries.
    ///
    /// Entries with zero early-voting days are ignored.
    pub fn from_entries(entries: Vec<WindowEntry>) -> WindowStats {
        let entries = entries
            .into_iter()
            .filter(|e| e.early_voting_days > 0)
            .collect::<Vec<_>>();
        if entries.is_empty() {
            return WindowStats::default();
        }

        let mut sorted = entries
            .iter()
            .map(|e| e.early_voting_days as f64)
            .collect::<Vec<_>>();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let upper_fence = q3 + (q3 - q1) * TUKEY_FENCE_MULTIPLIER;

        let max = sorted[sorted.len() - 1];
        let typical = sorted
            .iter()
            .rev()
            .find(|&&count| count <= upper_fence)
            .copied()
            .unwrap_or(max);

        let outlier_years = entries
            .iter()
            .filter(|e| e.early_voting_days as f64 > upper_fence)
            .map(|e| OutlierYear {
                year: e.year.clone(),
                early_voting_days: e.early_voting_days,
            })
            .collect::<Vec<_>>();

        log::debug!(
            "window: q1={} q3={} fence={} typical={} max={} outliers={}",
            q1,
            q3,
            upper_fence,
            typical,
            max,
            outlier_years.len()
        );

        WindowStats {
            entries,
            typical_early_voting_days: typical.round() as usize,
            max_early_voting_days: max.round() as usize,
            outlier_years,
        }
    }
}

/// Collect early-voting window statistics for `years` from the loaded datasets.
///
/// Years that are not loaded, or have no early-voting columns, are skipped.
pub fn analyze_early_voting_window<D: Datasets + ?Sized>(
    years: &[String],
    source: &D,
) -> WindowStats {
    let entries = years
        .iter()
        .filter_map(|year| source.dataset(year))
        .filter(|ds| ds.is_loaded())
        .map(|ds| WindowEntry {
            year: ds.year.clone(),
            early_voting_days: ds.early_voting_days(),
            total_days: ds.dates.len(),
        })
        .collect();
    WindowStats::from_entries(entries)
}
