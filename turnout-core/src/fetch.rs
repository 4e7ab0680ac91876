//! Retrieval of yearly exports from a local directory or an HTTP base URL.

use crate::error::FetchError;
use crate::registry::Registry;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::{Duration, Instant};

/// Attempts made for an HTTP export before giving up.
pub const MAX_TRIES: u32 = 3;

/// Delay before the first retry; doubled after each failed attempt.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Resolve a registry path against the data root.
pub fn resolve_source(data_root: &str, path: &str) -> String {
    if is_url(path) || Path::new(path).is_absolute() {
        return path.to_string();
    }
    if is_url(data_root) {
        return format!(
            "{}/{}",
            data_root.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
    }
    Path::new(data_root).join(path).to_string_lossy().into_owned()
}

async fn fetch_http(client: &Client, url: &str) -> Result<String, FetchError> {
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 1;
    loop {
        let result = match client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                response.text().await.map_err(FetchError::Http)
            }
            Ok(response) => Err(FetchError::Status {
                path: url.to_string(),
                status: response.status(),
            }),
            Err(e) => Err(FetchError::Http(e)),
        };
        match result {
            Ok(body) => return Ok(body),
            Err(e) if attempt < MAX_TRIES => {
                warn!("Attempt {}/{}: {}", attempt, MAX_TRIES, e);
                info!("Sleeping for {} milliseconds before retry", backoff.as_millis());
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_file(path: &str) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })
}

/// Fetch the raw CSV text registered for `year`.
pub async fn fetch_year_text(
    client: &Client,
    registry: &Registry,
    data_root: &str,
    year: &str,
) -> Result<String, FetchError> {
    let file = registry
        .get(year)
        .ok_or_else(|| FetchError::UnknownYear(year.to_string()))?;
    let source = resolve_source(data_root, &file.path);

    info!("Fetching data for {} from {}", year, source);
    let started = Instant::now();
    let body = if is_url(&source) {
        fetch_http(client, &source).await?
    } else {
        fetch_file(&source).await?
    };
    if body.trim().is_empty() {
        return Err(FetchError::EmptyFile(source));
    }
    info!(
        "Fetched {} bytes for {} in {} ms",
        body.len(),
        year,
        started.elapsed().as_millis()
    );
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_root() -> String {
        format!("{}/../fixtures", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn resolves_relative_paths() {
        assert_eq!(
            resolve_source("https://example.org/data/", "csv/May 2025.csv"),
            "https://example.org/data/csv/May 2025.csv"
        );
        assert_eq!(
            resolve_source("/srv/data", "csv/a.csv"),
            Path::new("/srv/data/csv/a.csv").to_string_lossy()
        );
        assert_eq!(
            resolve_source("/srv/data", "https://example.org/a.csv"),
            "https://example.org/a.csv"
        );
    }

    #[tokio::test]
    async fn fetches_bundled_fixture() {
        let registry = Registry::bundled().unwrap();
        let year = registry.years().remove(0);
        let body = fetch_year_text(&Client::new(), &registry, &fixtures_root(), &year)
            .await
            .unwrap();
        assert!(body.lines().count() > 1);
    }

    #[tokio::test]
    async fn unknown_year_and_missing_file() {
        let registry = Registry::from_json(
            r#"{ "gone": { "name": "Gone", "path": "csv/does-not-exist.csv" } }"#,
        )
        .unwrap();
        let client = Client::new();
        assert!(matches!(
            fetch_year_text(&client, &registry, &fixtures_root(), "1900").await,
            Err(FetchError::UnknownYear(_))
        ));
        assert!(matches!(
            fetch_year_text(&client, &registry, &fixtures_root(), "gone").await,
            Err(FetchError::Io { .. })
        ));
    }
}
