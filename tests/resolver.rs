//! End-to-end checks of the registry through the public API.

use safe_meal::mapping::{self, MapTarget};
use safe_meal::registry::{Category, Coordinates, LocationEntry, MatchTier, Registry};

fn al_baik_registry() -> Registry {
    Registry::from_entries(vec![
        LocationEntry {
            name: "Al Baik (البيك - الحرم)".into(),
            match_name: Some("Al Baik (البيك)".into()),
            category: Category::LunchDinner,
            coordinates: Coordinates::new(21.4190, 39.8230),
        },
        LocationEntry {
            name: "Al Baik (البيك - العزيزية)".into(),
            match_name: Some("Al Baik (البيك)".into()),
            category: Category::LunchDinner,
            coordinates: Coordinates::new(21.4080, 39.8800),
        },
    ])
    .unwrap()
}

#[test]
fn alias_query_lands_on_first_branch() {
    let registry = al_baik_registry();
    let hit = registry.resolve("Al Baik (البيك)").unwrap();
    assert_eq!(hit.tier, MatchTier::ExactAlias);
    assert!(hit.entry.name.contains("الحرم"));
    approx::assert_abs_diff_eq!(hit.entry.coordinates.lat, 21.4190, epsilon = 1e-9);
}

#[test]
fn arabic_brand_fragment_lands_on_first_branch() {
    let registry = al_baik_registry();
    let hit = registry.resolve("البيك").unwrap();
    assert_eq!(hit.tier, MatchTier::NameContainsQuery);
    assert!(hit.entry.name.contains("الحرم"));
}

#[test]
fn branch_name_resolves_exactly() {
    let registry = al_baik_registry();
    let hit = registry.resolve("al baik (البيك - العزيزية)").unwrap();
    assert_eq!(hit.tier, MatchTier::ExactName);
    approx::assert_abs_diff_eq!(hit.entry.coordinates.lon, 39.8800, epsilon = 1e-9);
}

#[test]
fn search_returns_both_branches() {
    let registry = al_baik_registry();
    let hits = registry.search("AL BAIK");
    assert_eq!(hits.len(), 2);
    assert!(registry.search("").is_empty());
}

#[test]
fn every_builtin_entry_round_trips_through_the_map() {
    let registry = Registry::builtin().unwrap();
    for entry in registry.all() {
        match mapping::target_for(&registry, &entry.name).unwrap() {
            MapTarget::Registry { popup, center, .. } => {
                assert_eq!(popup, entry.name);
                assert_eq!(center, entry.coordinates);
            }
            other => panic!("{} did not resolve: {:?}", entry.name, other),
        }
    }
}

#[test]
fn unknown_restaurant_falls_back_to_search() {
    let registry = Registry::builtin().unwrap();
    assert!(registry.resolve("xyz-nonexistent-restaurant").is_none());
    let target = mapping::target_for(&registry, "xyz-nonexistent-restaurant").unwrap();
    assert!(!target.is_registry());
}

#[test]
fn blank_name_has_no_map_target() {
    let registry = Registry::builtin().unwrap();
    assert!(mapping::target_for(&registry, "").is_none());
    assert!(mapping::target_for(&registry, "   ").is_none());
}
