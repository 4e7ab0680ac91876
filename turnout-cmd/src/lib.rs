//! Command implementations for the turnout CLI.
//!
//! Provides subcommands that load yearly turnout exports, run the chart
//! pipeline, and drive an interactive session with debounced re-rendering.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use turnout_core::Registry;
use turnout_data::{DataPresentation, DisplayAs, PipelineConfig, Selection, Toggles};
use turnout_data::DEFAULT_COLLAPSED_EARLY_VOTING_DAYS;

pub mod load;
pub mod query;
pub mod schedule;
pub mod session;

/// Where the registry and the CSV exports come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Year registry JSON (defaults to the bundled registry)
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Directory or http(s) base URL that registry paths are relative to
    #[arg(short = 'd', long, default_value = "fixtures")]
    pub data_root: String,
}

impl SourceArgs {
    pub fn load_registry(&self) -> anyhow::Result<Registry> {
        let registry = match &self.registry {
            Some(path) => Registry::from_path(path)
                .with_context(|| format!("Failed to load registry {}", path.display()))?,
            None => Registry::bundled()?,
        };
        if registry.is_empty() {
            anyhow::bail!("Registry has no years");
        }
        Ok(registry)
    }
}

/// Selection and toggle flags shared by rendering commands.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Year keys to compare (defaults to every registered year)
    #[arg(short = 'y', long = "year", value_delimiter = ',')]
    pub years: Vec<String>,

    /// Locations to chart; `total` selects the totals row
    #[arg(short = 'l', long = "location", value_delimiter = ',', default_value = "total")]
    pub locations: Vec<String>,

    /// Hide early-voting days
    #[arg(long)]
    pub no_early_voting: bool,

    /// Hide election day
    #[arg(long)]
    pub no_election_day: bool,

    /// per-day or cumulative
    #[arg(short = 'm', long, default_value = "per-day")]
    pub mode: DataPresentation,

    /// chart (JSON) or table
    #[arg(long, default_value = "chart")]
    pub display: DisplayAs,

    /// Show every early-voting day instead of the typical window
    #[arg(short = 'x', long)]
    pub include_extended_days: bool,

    /// Visible early-voting days when no typical window can be computed
    #[arg(long, default_value_t = DEFAULT_COLLAPSED_EARLY_VOTING_DAYS)]
    pub fallback_days: usize,
}

impl ViewArgs {
    pub fn selection(&self, registry: &Registry) -> Selection {
        let years = if self.years.is_empty() {
            registry.years()
        } else {
            self.years.clone()
        };
        Selection {
            years,
            locations: self.locations.clone(),
        }
    }

    pub fn toggles(&self) -> Toggles {
        Toggles {
            show_early_voting: !self.no_early_voting,
            show_election_day: !self.no_election_day,
            data_presentation: self.mode,
            display_as: self.display,
            include_extended_days: self.include_extended_days,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            fallback_early_voting_days: self.fallback_days,
            ..PipelineConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the selected years and print one chart render (JSON) or table
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print early-voting window statistics for the selected years
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Year keys (defaults to every registered year)
        #[arg(short = 'y', long = "year", value_delimiter = ',')]
        years: Vec<String>,
    },

    /// List known locations with their per-year election-day-only flag
    Locations {
        #[command(flatten)]
        source: SourceArgs,

        /// Year keys (defaults to every registered year)
        #[arg(short = 'y', long = "year", value_delimiter = ',')]
        years: Vec<String>,
    },

    /// Read selection and toggle commands from stdin, re-rendering after each burst
    Interactive {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Quiet period before re-rendering, in milliseconds
        #[arg(long, default_value_t = schedule::DEFAULT_DEBOUNCE.as_millis() as u64)]
        debounce_ms: u64,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Render { source, view } => query::run_render(&source, &view).await,
        Command::Stats { source, years } => query::run_stats(&source, &years).await,
        Command::Locations { source, years } => query::run_locations(&source, &years).await,
        Command::Interactive {
            source,
            view,
            debounce_ms,
        } => query::run_interactive(&source, &view, Duration::from_millis(debounce_ms)).await,
    }
}
