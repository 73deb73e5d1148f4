//! Built-in restaurant dataset.
//!
//! Hand-curated list of restaurants around the Haram and the main pilgrim
//! districts. Order matters: the resolver returns the first hit in this order.

use super::types::{Category, Coordinates, LocationEntry};

struct BuiltinRestaurant {
    name: &'static str,
    match_name: Option<&'static str>,
    category: Category,
    lat: f64,
    lon: f64,
}

const AL_BAIK: &str = "Al Baik (البيك)";

const BUILTIN_RESTAURANTS: &[BuiltinRestaurant] = &[
    // Breakfast
    BuiltinRestaurant {
        name: "Fares Restaurant (فارس للفطور)",
        match_name: None,
        category: Category::Breakfast,
        lat: 21.4035, lon: 39.8750,
    },
    BuiltinRestaurant {
        name: "Zamzam Lobby Lounge (ردهة زمزم لوبي - زمن الخير)",
        match_name: None,
        category: Category::Breakfast,
        lat: 21.4188, lon: 39.8236,
    },
    BuiltinRestaurant {
        name: "Al Majlis Restaurant (مطعم المجلس)",
        match_name: None,
        category: Category::Breakfast,
        lat: 21.4210, lon: 39.8280,
    },
    BuiltinRestaurant {
        name: "Al Shorfa Restaurant (مطعم الشرفة)",
        match_name: None,
        category: Category::Breakfast,
        lat: 21.4195, lon: 39.8245,
    },
    BuiltinRestaurant {
        name: "Al Atbaq Restaurant (مطعم الأطباق)",
        match_name: None,
        category: Category::Breakfast,
        lat: 21.4230, lon: 39.8260,
    },
    // Lunch / dinner
    BuiltinRestaurant {
        name: "Al Baik (البيك - الحرم)",
        match_name: Some(AL_BAIK),
        category: Category::LunchDinner,
        lat: 21.4190, lon: 39.8230,
    },
    BuiltinRestaurant {
        name: "Al Baik (البيك - العزيزية)",
        match_name: Some(AL_BAIK),
        category: Category::LunchDinner,
        lat: 21.4080, lon: 39.8800,
    },
    BuiltinRestaurant {
        name: "Al Tazaj (الطازج)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4120, lon: 39.8700,
    },
    BuiltinRestaurant {
        name: "Al Rehab Restaurant (مطعم الرحاب)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4250, lon: 39.8350,
    },
    BuiltinRestaurant {
        name: "Wadi Al Khair Restaurant (مطعم وادي الخير)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4000, lon: 39.8600,
    },
    BuiltinRestaurant {
        name: "Al Taahy Restaurant (مطعم الطاهي)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4400, lon: 39.8500,
    },
    BuiltinRestaurant {
        name: "Al Deyafa Restaurant (مطعم الضيافة)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4300, lon: 39.8200,
    },
    BuiltinRestaurant {
        name: "Hardee\u{2019}s (هارديز)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4185, lon: 39.8240,
    },
    BuiltinRestaurant {
        name: "Kudu (كودو)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.4192, lon: 39.8238,
    },
    BuiltinRestaurant {
        name: "Broast Al Farooj (مطعم بروست الفروج)",
        match_name: None,
        category: Category::LunchDinner,
        lat: 21.3900, lon: 39.8900,
    },
];

/// The built-in dataset as owned registry entries, in curated order.
pub fn builtin_entries() -> Vec<LocationEntry> {
    BUILTIN_RESTAURANTS
        .iter()
        .map(|r| LocationEntry {
            name: r.name.to_string(),
            match_name: r.match_name.map(str::to_string),
            category: r.category,
            coordinates: Coordinates::new(r.lat, r.lon),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_counts() {
        let entries = builtin_entries();
        assert_eq!(entries.len(), 15);
        let breakfast = entries.iter().filter(|e| e.category == Category::Breakfast).count();
        assert_eq!(breakfast, 5);
    }

    #[test]
    fn test_al_baik_branches_share_alias() {
        let entries = builtin_entries();
        let branches: Vec<_> = entries
            .iter()
            .filter(|e| e.match_name.as_deref() == Some(AL_BAIK))
            .collect();
        assert_eq!(branches.len(), 2);
        assert!(branches[0].name.contains("الحرم"));
        assert!(branches[1].name.contains("العزيزية"));
    }
}
