use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Registry bundled with the workspace fixtures.
pub static DEFAULT_REGISTRY: &str = include_str!("../../fixtures/registry.json");

/// Where one election's export lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionFile {
    /// Human readable election name, e.g. "May 2025".
    pub name: String,
    /// Path of the CSV export, relative to the data root unless absolute.
    pub path: String,
}

/// Ordered map from year key to its export file.
///
/// Key order in the JSON source is the configured year order, which governs
/// series order and colour assignment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registry {
    entries: Vec<(String, ElectionFile)>,
}

impl Registry {
    pub fn from_json(json: &str) -> Result<Registry, RegistryError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let entries = map
            .into_iter()
            .map(|(year, value)| {
                serde_json::from_value::<ElectionFile>(value).map(|file| (year, file))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Registry { entries })
    }

    pub fn from_path(path: &Path) -> Result<Registry, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Registry::from_json(&json)
    }

    /// The bundled fixture registry.
    pub fn bundled() -> Result<Registry, RegistryError> {
        Registry::from_json(DEFAULT_REGISTRY)
    }

    /// Year keys in configured order.
    pub fn years(&self) -> Vec<String> {
        self.entries.iter().map(|(year, _)| year.clone()).collect()
    }

    pub fn get(&self, year: &str) -> Option<&ElectionFile> {
        self.entries
            .iter()
            .find(|(key, _)| key == year)
            .map(|(_, file)| file)
    }

    pub fn order_of(&self, year: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == year)
    }

    /// Display name for a year key, falling back to the key itself.
    pub fn display_name<'a>(&'a self, year: &'a str) -> &'a str {
        self.get(year).map(|f| f.name.as_str()).unwrap_or(year)
    }

    /// Order `years` by registry position; unknown keys keep their relative order at the end.
    pub fn sort_years(&self, years: &mut [String]) {
        years.sort_by_key(|y| self.order_of(y).unwrap_or(usize::MAX));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "2025_1": { "name": "May 2025", "path": "csv/May 2025 Municipal.csv" },
        "2023_2": { "name": "June 2023", "path": "csv/June 2023 Municipal Runoff.csv" },
        "2021_2": { "name": "June 2021", "path": "csv/June 2021 Municipal Runoff.csv" }
    }"#;

    #[test]
    fn keeps_configured_order() {
        let registry = Registry::from_json(JSON).unwrap();
        assert_eq!(registry.years(), vec!["2025_1", "2023_2", "2021_2"]);
        assert_eq!(registry.order_of("2021_2"), Some(2));
        assert_eq!(registry.get("2023_2").unwrap().name, "June 2023");
        assert_eq!(registry.display_name("1999"), "1999");
    }

    #[test]
    fn sorts_selected_years_by_registry_order() {
        let registry = Registry::from_json(JSON).unwrap();
        let mut years = vec!["1999".to_string(), "2021_2".to_string(), "2025_1".to_string()];
        registry.sort_years(&mut years);
        assert_eq!(years, vec!["2025_1", "2021_2", "1999"]);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            Registry::from_json(r#"{ "2025": { "name": "x" } }"#),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn bundled_registry_parses() {
        let registry = Registry::bundled().unwrap();
        assert!(!registry.is_empty());
    }
}
