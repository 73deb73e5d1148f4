//! File-based response cache at ~/.safe-meal/cache.json.
//!
//! TTL: 24 hours. Keys are normalised requests (lower-cased, allergies
//! sorted) so the same question in a different order hits the same entry.

use super::types::{MealQuery, RestaurantQuery};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_TTL_MS: i64 = 24 * 3600 * 1000;

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    text: String,
    timestamp: i64,
}

/// Cached model answers keyed by request.
pub struct ResponseCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    /// Load the cache from the default location (~/.safe-meal/cache.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load the cache from a specific path.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".safe-meal")
            .join("cache.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable response cache");
                None
            }
        }
    }

    /// Cached text for `key`, unless missing or expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(&key.to_lowercase())?;
        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            return None;
        }
        Some(entry.text.clone())
    }

    /// Store an answer and persist to disk. Expired entries are dropped.
    pub fn put(&mut self, key: &str, text: &str) {
        let now = chrono::Utc::now().timestamp_millis();
        self.entries.retain(|_, e| now - e.timestamp <= CACHE_TTL_MS);
        self.entries.insert(
            key.to_lowercase(),
            CacheEntry { text: text.to_string(), timestamp: now },
        );
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %e, "cannot write response cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "cannot serialise response cache"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn allergy_key(allergies: &[super::types::AllergyType]) -> String {
    let mut slugs: Vec<_> = allergies.iter().map(|a| a.slug()).collect();
    slugs.sort_unstable();
    slugs.dedup();
    slugs.join("+")
}

/// Key for a text-only meal analysis.
pub fn meal_key(query: &MealQuery) -> String {
    format!(
        "meal|{}|{}",
        allergy_key(&query.allergies),
        query.meal_name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    )
}

/// Key for a restaurant search.
pub fn restaurant_key(query: &RestaurantQuery) -> String {
    format!(
        "restaurants|{}|{}|{}",
        allergy_key(&query.allergies),
        query.area_or_default(),
        query.meal_type_or_default().label_ar()
    )
}
