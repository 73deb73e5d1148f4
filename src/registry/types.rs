//! Core types for the restaurant registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Makkah metropolitan bounding region used to sanity-check coordinates.
pub const MAKKAH_LAT_RANGE: (f64, f64) = (21.20, 21.70);
pub const MAKKAH_LON_RANGE: (f64, f64) = (39.60, 40.10);

/// Meal category of a registry entry. Drives the marker glyph only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "فطور", alias = "breakfast")]
    Breakfast,
    #[serde(rename = "غداء/عشاء", alias = "lunch_dinner")]
    LunchDinner,
}

impl Category {
    /// Arabic label shown next to suggestions and in marker popups.
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "فطور",
            Self::LunchDinner => "غداء/عشاء",
        }
    }

    /// Marker colour on the map legend.
    pub fn marker_color(self) -> &'static str {
        match self {
            Self::Breakfast => "gold",
            Self::LunchDinner => "green",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if the point lies inside the Makkah metropolitan region.
    pub fn in_makkah(&self) -> bool {
        (MAKKAH_LAT_RANGE.0..=MAKKAH_LAT_RANGE.1).contains(&self.lat)
            && (MAKKAH_LON_RANGE.0..=MAKKAH_LON_RANGE.1).contains(&self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// One curated restaurant location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Display name, unique per entry. Branches carry a distinguishing suffix.
    pub name: String,
    /// Brand alias shared by every branch of the same chain.
    #[serde(default, rename = "matchName", skip_serializing_if = "Option::is_none")]
    pub match_name: Option<String>,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

impl LocationEntry {
    /// Label used when handing a resolved entry to the map: the brand alias
    /// if there is one, otherwise the display name.
    pub fn canonical_label(&self) -> &str {
        self.match_name.as_deref().unwrap_or(&self.name)
    }
}

/// Registry load and validation errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry entry #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate registry name '{name}'")]
    DuplicateName { name: String },

    #[error("registry entry '{name}' has an empty matchName")]
    EmptyMatchName { name: String },

    #[error("registry entry '{name}' lies outside Makkah: {coordinates}")]
    OutOfRegion { name: String, coordinates: Coordinates },

    #[error("cannot read registry file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid registry file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
