//! Restaurant registry for Safe Meal.
//!
//! Holds the curated list of restaurants with coordinates, validates it once
//! at load time, and exposes read-only lookup: tiered name resolution for
//! "show on map" and substring filtering for search-as-you-type.

pub mod data;
pub mod resolver;
pub mod types;

pub use resolver::{filter_by_name, resolve, MatchTier, Resolution};
pub use types::{Category, Coordinates, LocationEntry, RegistryError};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Immutable, validated list of restaurant locations.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<LocationEntry>,
}

impl Registry {
    /// The built-in dataset, validated like any other source.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_entries(data::builtin_entries())
    }

    /// Build a registry from arbitrary entries, enforcing every invariant.
    pub fn from_entries(entries: Vec<LocationEntry>) -> Result<Self, RegistryError> {
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// Load a registry from a JSON array of entries.
    ///
    /// Accepts both `lon` and `lng` for longitude and the Arabic category
    /// labels used by the curated table.
    pub fn load_from(path: &Path) -> Result<Self, RegistryError> {
        let data = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<LocationEntry> =
            serde_json::from_str(&data).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let registry = Self::from_entries(entries)?;
        tracing::info!(path = %path.display(), entries = registry.len(), "loaded restaurant registry");
        Ok(registry)
    }

    /// Every entry in curated order.
    pub fn all(&self) -> &[LocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best single match for a free-text name, or `None`.
    pub fn resolve(&self, query: &str) -> Option<Resolution<'_>> {
        resolve(query, &self.entries)
    }

    /// Suggestions for a partially typed name.
    pub fn search(&self, query: &str) -> Vec<&LocationEntry> {
        filter_by_name(query, &self.entries)
    }
}

fn validate(entries: &[LocationEntry]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for (index, e) in entries.iter().enumerate() {
        if e.name.trim().is_empty() {
            return Err(RegistryError::EmptyName { index });
        }
        if !seen.insert(e.name.to_lowercase()) {
            return Err(RegistryError::DuplicateName { name: e.name.clone() });
        }
        if e.match_name.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(RegistryError::EmptyMatchName { name: e.name.clone() });
        }
        if !e.coordinates.in_makkah() {
            return Err(RegistryError::OutOfRegion {
                name: e.name.clone(),
                coordinates: e.coordinates,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, lat: f64, lon: f64) -> LocationEntry {
        LocationEntry {
            name: name.to_string(),
            match_name: None,
            category: Category::Breakfast,
            coordinates: Coordinates::new(lat, lon),
        }
    }

    #[test]
    fn test_builtin_passes_validation() {
        let builtin = Registry::builtin().expect("built-in table must validate");
        assert_eq!(builtin.len(), 15);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Registry::from_entries(vec![
            entry("Kudu", 21.42, 39.82),
            entry("kudu", 21.41, 39.83),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[test]
    fn test_rejects_blank_name() {
        let err = Registry::from_entries(vec![entry("  ", 21.42, 39.82)]).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName { index: 0 }));
    }

    #[test]
    fn test_rejects_blank_alias() {
        let mut e = entry("Kudu", 21.42, 39.82);
        e.match_name = Some(String::new());
        let err = Registry::from_entries(vec![e]).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyMatchName { .. }));
    }

    #[test]
    fn test_rejects_out_of_region() {
        // Medina is not Makkah.
        let err = Registry::from_entries(vec![entry("Far Away", 24.4686, 39.6142)]).unwrap_err();
        assert!(matches!(err, RegistryError::OutOfRegion { .. }));
    }

    #[test]
    fn test_load_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        let json = r#"[
            { "name": "Al Baik (البيك - الحرم)", "lat": 21.4190, "lng": 39.8230,
              "type": "غداء/عشاء", "matchName": "Al Baik (البيك)" },
            { "name": "Fares Restaurant (فارس للفطور)", "lat": 21.4035, "lon": 39.8750,
              "type": "breakfast" }
        ]"#;
        fs::write(&path, json).unwrap();

        let registry = Registry::load_from(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.all()[0].match_name.as_deref(), Some("Al Baik (البيك)"));
        assert_eq!(registry.all()[1].category, Category::Breakfast);
        approx::assert_abs_diff_eq!(registry.all()[0].coordinates.lon, 39.8230, epsilon = 1e-9);
    }

    #[test]
    fn test_load_from_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Registry::load_from(&path), Err(RegistryError::Parse { .. })));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(Registry::load_from(&path), Err(RegistryError::Io { .. })));
    }
}
