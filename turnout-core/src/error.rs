//! Error types for turnout ingestion and configuration.
use thiserror::Error;

/// A yearly export that could not be turned into a dataset.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("CSV input is empty")]
    EmptyInput,

    /// Header row present but no location rows
    #[error("CSV is incomplete: expected a header and at least one row, found {lines} line(s)")]
    MissingRows { lines: usize },

    /// Header row has no usable date columns
    #[error("No valid date headers found")]
    NoDateHeaders,

    /// Reader-level failure
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// The year registry could not be loaded.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to parse registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read registry: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieving a year's export failed.
#[cfg(feature = "api")]
#[derive(Error, Debug)]
pub enum FetchError {
    /// Year key missing from the registry
    #[error("No data file registered for year {0}")]
    UnknownYear(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Fetch failed for {path}: {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File was fetched but holds nothing
    #[error("Fetched file {0} is empty")]
    EmptyFile(String),
}
