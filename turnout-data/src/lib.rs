//! Turnout series processing for charting and tables.
//!
//! This crate takes parsed yearly datasets and a selection, and produces the
//! aligned labels, coloured series, title and footnote a chart needs.

pub mod align;
pub mod present;
pub mod table;
pub mod transform;
pub mod window;

pub use align::LabelAxis;
pub use present::{render, AlignedDataset, AlignedSeries, ChartShape, ChartUpdate, Rendered};
pub use transform::{DataPresentation, DisplayAs, Selection, Toggles, VisibleWindow};
pub use window::{analyze_early_voting_window, WindowStats};

/// Visible early-voting days when no typical window can be computed.
pub const DEFAULT_COLLAPSED_EARLY_VOTING_DAYS: usize = 12;

/// Tunables for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub fallback_early_voting_days: usize,
    pub palette: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            fallback_early_voting_days: DEFAULT_COLLAPSED_EARLY_VOTING_DAYS,
            palette: present::PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Colour for the `index`-th emitted series, cycling through the palette.
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return present::PALETTE[index % present::PALETTE.len()];
        }
        &self.palette[index % self.palette.len()]
    }
}
