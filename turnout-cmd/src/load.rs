//! Concurrent, best-effort loading of yearly exports into the store.
//!
//! Every requested year is fetched on its own task. A failed fetch or parse
//! marks only that year failed; sibling years still load.

use log::{error, info, warn};
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use tokio::task::{Id, JoinSet};
use turnout_core::fetch::fetch_year_text;
use turnout_core::{FetchError, Registry};
use turnout_store::{LoadState, Repository};

type FetchResult = (String, Result<String, FetchError>);

/// What happened to one completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(String),
    Failed { year: String, reason: String },
}

/// Totals for a finished batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub skipped: Vec<String>,
}

/// Spawns fetches and applies their results to a [`Repository`].
///
/// Fetch tasks run on the runtime; parsing and store updates happen on the
/// task that calls [`Loader::next_result`], since the store is single-threaded.
pub struct Loader {
    client: Client,
    registry: Registry,
    data_root: String,
    tasks: JoinSet<FetchResult>,
    in_flight: HashSet<String>,
    task_years: HashMap<Id, String>,
}

impl Loader {
    pub fn new(client: Client, registry: Registry, data_root: &str) -> Self {
        Loader {
            client,
            registry,
            data_root: data_root.to_string(),
            tasks: JoinSet::new(),
            in_flight: HashSet::new(),
            task_years: HashMap::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Start fetches for `years`, returning the years actually spawned.
    ///
    /// Years already in flight are never fetched twice. Loaded years are
    /// skipped unless `refresh` is set.
    pub fn request(&mut self, store: &Repository, years: &[String], refresh: bool) -> Vec<String> {
        let mut spawned = Vec::new();
        for year in years {
            if self.in_flight.contains(year) {
                continue;
            }
            if !refresh && store.load_state(year) == Some(LoadState::Loaded) {
                continue;
            }
            store.mark_pending(year);

            let client = self.client.clone();
            let registry = self.registry.clone();
            let data_root = self.data_root.clone();
            let year = year.clone();
            spawned.push(year.clone());
            self.track(year.clone(), async move {
                let result = fetch_year_text(&client, &registry, &data_root, &year).await;
                (year, result)
            });
        }
        if !spawned.is_empty() {
            info!("load: fetching {} year(s): {}", spawned.len(), spawned.join(", "));
        }
        spawned
    }

    fn track<F>(&mut self, year: String, task: F)
    where
        F: Future<Output = FetchResult> + Send + 'static,
    {
        let handle = self.tasks.spawn(task);
        self.task_years.insert(handle.id(), year.clone());
        self.in_flight.insert(year);
    }

    /// Wait for the next fetch to finish and apply it to `store`.
    ///
    /// A task that panics or is cancelled marks its own year failed.
    /// Returns `None` once nothing is in flight.
    pub async fn next_result(&mut self, store: &Repository) -> Option<LoadOutcome> {
        loop {
            match self.tasks.join_next_with_id().await? {
                Ok((id, (year, fetched))) => {
                    self.task_years.remove(&id);
                    self.in_flight.remove(&year);
                    return Some(apply(store, year, fetched));
                }
                Err(e) => {
                    error!("load: fetch task failed: {}", e);
                    let Some(year) = self.task_years.remove(&e.id()) else {
                        continue;
                    };
                    self.in_flight.remove(&year);
                    let reason = format!("fetch task aborted: {}", e);
                    store.mark_failed(&year, &reason);
                    return Some(LoadOutcome::Failed { year, reason });
                }
            }
        }
    }

    /// Apply every outstanding fetch.
    pub async fn finish(&mut self, store: &Repository) -> LoadReport {
        let mut report = LoadReport::default();
        while let Some(outcome) = self.next_result(store).await {
            match outcome {
                LoadOutcome::Loaded(year) => report.loaded.push(year),
                LoadOutcome::Failed { year, reason } => report.failed.push((year, reason)),
            }
        }
        report
    }
}

fn apply(store: &Repository, year: String, fetched: Result<String, FetchError>) -> LoadOutcome {
    let body = match fetched {
        Ok(body) => body,
        Err(e) => {
            warn!("load: {} unavailable: {}", year, e);
            let reason = e.to_string();
            store.mark_failed(&year, &reason);
            return LoadOutcome::Failed { year, reason };
        }
    };
    match store.load_year_csv(&year, &body) {
        Ok(()) => LoadOutcome::Loaded(year),
        Err(e) => LoadOutcome::Failed {
            year,
            reason: e.to_string(),
        },
    }
}

/// Fetch and load `years`, waiting for all of them.
pub async fn load_years(
    store: &Repository,
    client: &Client,
    registry: &Registry,
    data_root: &str,
    years: &[String],
    refresh: bool,
) -> LoadReport {
    let mut loader = Loader::new(client.clone(), registry.clone(), data_root);
    let spawned = loader.request(store, years, refresh);
    let mut report = loader.finish(store).await;
    report.skipped = years
        .iter()
        .filter(|y| !spawned.contains(*y))
        .cloned()
        .collect();
    info!(
        "load: {} loaded, {} failed, {} skipped",
        report.loaded.len(),
        report.failed.len(),
        report.skipped.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_root() -> String {
        format!("{}/../fixtures", env!("CARGO_MANIFEST_DIR"))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn loads_every_bundled_year() {
        let store = Repository::new();
        let registry = Registry::bundled().unwrap();
        let years = registry.years();
        let report = load_years(&store, &Client::new(), &registry, &fixtures_root(), &years, false).await;
        assert_eq!(report.loaded.len(), years.len());
        assert!(report.failed.is_empty());
        for year in &years {
            assert!(store.is_data_loaded(year), "{} not loaded", year);
        }
    }

    #[tokio::test]
    async fn one_failed_year_does_not_abort_siblings() {
        let store = Repository::new();
        let registry = Registry::from_json(
            r#"{
                "2025_1": { "name": "May 2025", "path": "csv/May 2025 Municipal.csv" },
                "gone": { "name": "Gone", "path": "csv/missing.csv" }
            }"#,
        )
        .unwrap();
        let years = strings(&["2025_1", "gone", "unregistered"]);
        let report = load_years(&store, &Client::new(), &registry, &fixtures_root(), &years, false).await;

        assert_eq!(report.loaded, strings(&["2025_1"]));
        assert_eq!(report.failed.len(), 2);
        assert!(store.is_data_loaded("2025_1"));
        assert!(matches!(store.load_state("gone"), Some(LoadState::Failed(_))));
        assert!(!store.is_data_loaded("gone"));
    }

    #[tokio::test]
    async fn loaded_years_are_skipped_unless_refreshed() {
        let store = Repository::new();
        let registry = Registry::bundled().unwrap();
        let years = strings(&["2025_1"]);
        let client = Client::new();
        load_years(&store, &client, &registry, &fixtures_root(), &years, false).await;

        let again = load_years(&store, &client, &registry, &fixtures_root(), &years, false).await;
        assert!(again.loaded.is_empty());
        assert_eq!(again.skipped, years);

        let refreshed = load_years(&store, &client, &registry, &fixtures_root(), &years, true).await;
        assert_eq!(refreshed.loaded, years);
    }

    #[tokio::test]
    async fn duplicate_requests_share_one_fetch() {
        let store = Repository::new();
        let registry = Registry::bundled().unwrap();
        let mut loader = Loader::new(Client::new(), registry, &fixtures_root());
        let years = strings(&["2023_2"]);
        assert_eq!(loader.request(&store, &years, false), years);
        assert!(loader.request(&store, &years, true).is_empty());
        assert_eq!(store.pending_years(&years), years);

        let report = loader.finish(&store).await;
        assert_eq!(report.loaded, years);
        assert!(store.pending_years(&years).is_empty());
        assert_eq!(loader.in_flight(), 0);
    }

    #[tokio::test]
    async fn panicked_task_fails_only_its_year() {
        let store = Repository::new();
        let registry = Registry::bundled().unwrap();
        let mut loader = Loader::new(Client::new(), registry, &fixtures_root());
        store.mark_pending("broken");
        loader.track("broken".to_string(), async {
            let body: Option<String> = None;
            ("broken".to_string(), Ok(body.expect("fetch blew up")))
        });
        loader.request(&store, &strings(&["2025_1"]), false);
        assert_eq!(loader.in_flight(), 2);

        let report = loader.finish(&store).await;
        assert_eq!(report.loaded, strings(&["2025_1"]));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert_eq!(loader.in_flight(), 0);
        assert!(matches!(store.load_state("broken"), Some(LoadState::Failed(_))));
        assert!(store.pending_years(&strings(&["broken", "2025_1"])).is_empty());
    }
}
