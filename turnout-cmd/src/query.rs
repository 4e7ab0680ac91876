//! One-shot commands and the interactive entry point.

use crate::load::{load_years, Loader};
use crate::schedule::Debouncer;
use crate::session::{run_session, Session};
use crate::{SourceArgs, ViewArgs};
use log::{info, warn};
use std::time::Duration;
use turnout_core::Registry;
use turnout_data::table::render_table;
use turnout_data::{analyze_early_voting_window, render, DisplayAs};
use turnout_store::{LocationClassification, Repository};
use turnout_utils::text::format_readable_list;

/// Names shown per location before eliding.
const LOCATION_YEARS_SHOWN: usize = 4;

fn years_or_all(registry: &Registry, years: &[String]) -> Vec<String> {
    let mut years = if years.is_empty() {
        registry.years()
    } else {
        years.to_vec()
    };
    registry.sort_years(&mut years);
    years
}

async fn load_store(
    source: &SourceArgs,
    registry: &Registry,
    years: &[String],
) -> anyhow::Result<Repository> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let store = Repository::new();
    let report = load_years(&store, &client, registry, &source.data_root, years, false).await;
    for (year, reason) in &report.failed {
        warn!("{} has no data: {}", year, reason);
    }
    Ok(store)
}

/// Load the selected years and print one render.
pub async fn run_render(source: &SourceArgs, view: &ViewArgs) -> anyhow::Result<()> {
    let registry = source.load_registry()?;
    let selection = view.selection(&registry);
    let store = load_store(source, &registry, &selection.years).await?;

    let rendered = render(
        &store.snapshot(),
        &registry,
        &selection,
        &view.toggles(),
        &view.config(),
    );
    match view.display {
        DisplayAs::Table => {
            println!("{}", rendered.summary);
            print!("{}", render_table(&rendered.dataset));
            if !rendered.footnote.is_empty() {
                println!("{}", rendered.footnote);
            }
        }
        DisplayAs::Chart => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }
    Ok(())
}

pub async fn run_stats(source: &SourceArgs, years: &[String]) -> anyhow::Result<()> {
    let registry = source.load_registry()?;
    let years = years_or_all(&registry, years);
    let store = load_store(source, &registry, &years).await?;
    let stats = analyze_early_voting_window(&years, &store.snapshot());
    info!(
        "stats: typical {} of max {} early-voting days",
        stats.typical_early_voting_days, stats.max_early_voting_days
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn describe_location(registry: &Registry, row: &LocationClassification) -> String {
    let per_year = row
        .years
        .iter()
        .map(|(year, edo)| {
            format!(
                "{} {}",
                registry.display_name(year),
                if *edo { "election day only" } else { "early voting" }
            )
        })
        .collect::<Vec<_>>();
    format!("{}: {}", row.name, format_readable_list(&per_year, LOCATION_YEARS_SHOWN))
}

pub async fn run_locations(source: &SourceArgs, years: &[String]) -> anyhow::Result<()> {
    let registry = source.load_registry()?;
    let years = years_or_all(&registry, years);
    let store = load_store(source, &registry, &years).await?;
    for row in store.classify_locations(&years) {
        println!("{}", describe_location(&registry, &row));
    }
    Ok(())
}

/// Run an interactive session on stdin until end of input or `quit`.
pub async fn run_interactive(
    source: &SourceArgs,
    view: &ViewArgs,
    debounce: Duration,
) -> anyhow::Result<()> {
    let registry = source.load_registry()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let loader = Loader::new(client, registry.clone(), &source.data_root);
    let session = Session::new(
        Repository::new(),
        registry.clone(),
        view.selection(&registry),
        view.toggles(),
        view.config(),
    );
    info!("session: started with debounce {} ms", debounce.as_millis());
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(session, loader, input, Debouncer::new(debounce), &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_follow_registry_order() {
        let registry = Registry::bundled().unwrap();
        let years = years_or_all(&registry, &["2019_2".to_string(), "2025_1".to_string()]);
        assert_eq!(years, vec!["2025_1".to_string(), "2019_2".to_string()]);
        assert_eq!(years_or_all(&registry, &[]), registry.years());
    }

    #[test]
    fn location_description_names_each_year() {
        let registry = Registry::bundled().unwrap();
        let row = LocationClassification {
            name: "Fire Station 12".to_string(),
            years: vec![("2025_1".to_string(), true), ("2023_2".to_string(), false)],
        };
        assert_eq!(
            describe_location(&registry, &row),
            "Fire Station 12: May 2025 election day only and June 2023 early voting"
        );
    }

    #[tokio::test]
    async fn fixture_years_load_into_store() {
        let source = SourceArgs {
            registry: None,
            data_root: format!("{}/../fixtures", env!("CARGO_MANIFEST_DIR")),
        };
        let registry = source.load_registry().unwrap();
        let years = years_or_all(&registry, &[]);
        let store = load_store(&source, &registry, &years).await.unwrap();
        assert_eq!(store.is_election_day_only_in("2025_1", "Fire Station 12"), Some(true));
        assert_eq!(store.is_election_day_only_in("2023_2", "Fire Station 12"), Some(false));

        let stats = analyze_early_voting_window(&years, &store.snapshot());
        assert_eq!(stats.typical_early_voting_days, 12);
        assert_eq!(stats.outlier_years.len(), 1);
        assert_eq!(stats.outlier_years[0].year, "2021_2");
    }
}
