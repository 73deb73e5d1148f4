//! Map glue: default view, markers, and "show on map" targeting.
//!
//! Turns resolver output into something a map front-end can act on. A name
//! the registry does not know becomes an external Google Maps search link.

use crate::registry::{Category, Coordinates, LocationEntry, MatchTier, Registry};
use serde::Serialize;

/// Masjid al-Haram, the default map center.
pub const HARAM: Coordinates = Coordinates::new(21.4225, 39.8262);
pub const DEFAULT_ZOOM: u8 = 13;
pub const FOCUS_ZOOM: u8 = 16;

const MAPS_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";
const IMAGE_SEARCH: &str = "https://www.google.com/search?q=";

/// Initial camera of the map screen.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self { center: HARAM, zoom: DEFAULT_ZOOM }
    }
}

/// One pin on the map.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub name: String,
    pub category: Category,
    pub color: &'static str,
    pub coordinates: Coordinates,
    pub directions_url: String,
}

impl Marker {
    pub fn from_entry(entry: &LocationEntry) -> Self {
        Self {
            name: entry.name.clone(),
            category: entry.category,
            color: entry.category.marker_color(),
            coordinates: entry.coordinates,
            directions_url: directions_url(entry.coordinates),
        }
    }
}

/// Everything the map screen needs on first load.
#[derive(Debug, Clone, Serialize)]
pub struct MapOverview {
    pub view: MapView,
    pub markers: Vec<Marker>,
}

pub fn overview(registry: &Registry) -> MapOverview {
    MapOverview {
        view: MapView::default(),
        markers: registry.all().iter().map(Marker::from_entry).collect(),
    }
}

/// Where "show on map" should take the user.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapTarget {
    /// A registry hit: center on the entry and open its popup.
    Registry {
        label: String,
        popup: String,
        tier: MatchTier,
        center: Coordinates,
        zoom: u8,
        marker: Marker,
    },
    /// Unknown to the registry: hand off to an external map search.
    ExternalSearch { query: String, url: String },
}

impl MapTarget {
    pub fn is_registry(&self) -> bool {
        matches!(self, Self::Registry { .. })
    }
}

/// Map target for a name typed by the user or picked from suggestions.
/// A blank name has no target.
pub fn target_for(registry: &Registry, name: &str) -> Option<MapTarget> {
    let name = name.trim();
    (!name.is_empty()).then(|| target_with_context(registry, name, None))
}

/// Map target for an AI-suggested restaurant. The district is only used to
/// sharpen the external search when the registry has no match.
pub fn target_with_context(registry: &Registry, name: &str, area: Option<&str>) -> MapTarget {
    match registry.resolve(name) {
        Some(hit) => {
            tracing::debug!(query = name, entry = %hit.entry.name, tier = %hit.tier, "resolved restaurant");
            MapTarget::Registry {
                label: hit.entry.canonical_label().to_string(),
                popup: hit.entry.name.clone(),
                tier: hit.tier,
                center: hit.entry.coordinates,
                zoom: FOCUS_ZOOM,
                marker: Marker::from_entry(hit.entry),
            }
        }
        None => {
            tracing::debug!(query = name, "restaurant not in registry, falling back to map search");
            let query = external_query(name, area);
            let url = search_url(&query);
            MapTarget::ExternalSearch { query, url }
        }
    }
}

fn external_query(name: &str, area: Option<&str>) -> String {
    match area.map(str::trim).filter(|a| !a.is_empty()) {
        Some(area) => format!("{} {} makkah", name.trim(), area),
        None => name.trim().to_string(),
    }
}

/// Google Maps search link for free text.
pub fn search_url(query: &str) -> String {
    format!("{}{}", MAPS_SEARCH, urlencoding::encode(query))
}

/// Google Maps link pinned to exact coordinates.
pub fn directions_url(c: Coordinates) -> String {
    format!("{}{},{}", MAPS_SEARCH, c.lat, c.lon)
}

/// Image search for a restaurant's photos.
pub fn photos_url(name: &str, area: &str) -> String {
    let q = format!("{} {} makkah photos", name.trim(), area.trim());
    format!("{}{}&tbm=isch", IMAGE_SEARCH, urlencoding::encode(&q))
}
