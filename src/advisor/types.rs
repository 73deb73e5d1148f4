//! Request and response types exchanged with the recommendation service.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Asia::Riyadh;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default district when the user leaves the area blank.
pub const DEFAULT_AREA: &str = "مكة المكرمة";

/// Districts offered by the restaurant finder, as `(value, label)`.
pub const AREAS: &[(&str, &str)] = &[
    ("", "مكة المكرمة (الكل)"),
    ("المنطقة المركزية", "قرب الحرم المكي"),
    ("حي العزيزية", "العزيزية"),
    ("حي الشوقية", "الشوقية"),
    ("المشاعر المقدسة", "منى ومزدلفة"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergyType {
    Gluten,
    Peanut,
    Lactose,
    Nut,
    Egg,
    Fish,
    Sesame,
    Shellfish,
}

impl AllergyType {
    pub const ALL: [AllergyType; 8] = [
        Self::Gluten,
        Self::Peanut,
        Self::Lactose,
        Self::Nut,
        Self::Egg,
        Self::Fish,
        Self::Sesame,
        Self::Shellfish,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Gluten => "gluten",
            Self::Peanut => "peanut",
            Self::Lactose => "lactose",
            Self::Nut => "nut",
            Self::Egg => "egg",
            Self::Fish => "fish",
            Self::Sesame => "sesame",
            Self::Shellfish => "shellfish",
        }
    }

    /// Arabic label, as shown to the user and sent to the model.
    pub fn label_ar(self) -> &'static str {
        match self {
            Self::Gluten => "حساسية الجلوتين",
            Self::Peanut => "حساسية الفول السوداني",
            Self::Lactose => "حساسية اللاكتوز",
            Self::Nut => "حساسية المكسرات",
            Self::Egg => "حساسية البيض",
            Self::Fish => "حساسية السمك",
            Self::Sesame => "حساسية السمسم",
            Self::Shellfish => "حساسية القشريات",
        }
    }
}

impl fmt::Display for AllergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_ar())
    }
}

impl FromStr for AllergyType {
    type Err = String;

    /// Accepts the English slug (any case) or the exact Arabic label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let lower = t.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.slug() == lower || a.label_ar() == t)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|a| a.slug()).collect();
                format!("Unknown allergy '{}'. Use one of: {}", s, known.join(", "))
            })
    }
}

/// Join allergy labels the way the prompts expect: "A و B و C".
pub fn join_allergies(allergies: &[AllergyType]) -> String {
    allergies
        .iter()
        .map(|a| a.label_ar())
        .collect::<Vec<_>>()
        .join(" و ")
}

/// Safety verdict for a single meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Unsafe,
}

impl SafetyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Caution => "CAUTION",
            Self::Unsafe => "UNSAFE",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
}

impl MealType {
    pub fn label_ar(self) -> &'static str {
        match self {
            Self::Breakfast => "فطور",
            Self::Lunch => "غداء",
            Self::Dinner => "عشاء",
        }
    }

    /// Meal that fits the current hour in Makkah.
    pub fn for_makkah_time(now: DateTime<Utc>) -> Self {
        let hour = now.with_timezone(&Riyadh).hour();
        match hour {
            0..=10 => Self::Breakfast,
            11..=16 => Self::Lunch,
            _ => Self::Dinner,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_ar())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "فطور" => Ok(Self::Breakfast),
            "lunch" | "غداء" => Ok(Self::Lunch),
            "dinner" | "عشاء" => Ok(Self::Dinner),
            _ => Err(format!("Unknown meal '{}'. Use breakfast, lunch or dinner.", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    #[serde(rename = "اقتصادي")]
    Economy,
    #[serde(rename = "متوسط")]
    Moderate,
    #[serde(rename = "فاخر")]
    Luxury,
}

impl BudgetLevel {
    /// Recognise a budget label, Arabic or English. Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "اقتصادي" | "economy" | "budget" => Some(Self::Economy),
            "متوسط" | "moderate" | "mid" => Some(Self::Moderate),
            "فاخر" | "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Economy => "\u{1F4B0}",
            Self::Moderate => "\u{1F4B0}\u{1F4B0}",
            Self::Luxury => "\u{1F4B0}\u{1F4B0}\u{1F4B0}",
        }
    }
}

/// Model verdict for one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    pub safety_status: SafetyLevel,
    pub explanation: String,
    #[serde(default)]
    pub potential_allergens: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub safe_ingredients: Vec<String>,
}

/// One restaurant as suggested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub safety_level: String,
    #[serde(default)]
    pub suggested_meals: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Free text from the model; see [`Restaurant::budget`].
    #[serde(default)]
    pub budget_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_uri: Option<String>,
}

impl Restaurant {
    pub fn budget(&self) -> Option<BudgetLevel> {
        self.budget_level.as_deref().and_then(BudgetLevel::from_label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantShortlist {
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
}

/// Meal to check. Either a name, a photo, or both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealQuery {
    #[serde(default)]
    pub meal_name: String,
    pub allergies: Vec<AllergyType>,
    /// Base64 JPEG, optionally as a `data:` URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Restaurant search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub allergies: Vec<AllergyType>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
}

impl RestaurantQuery {
    /// District sent to the model; blank means all of Makkah.
    pub fn area_or_default(&self) -> &str {
        self.area
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AREA)
    }

    pub fn meal_type_or_default(&self) -> MealType {
        self.meal_type.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_allergy_from_slug_and_label() {
        assert_eq!("Gluten".parse::<AllergyType>().unwrap(), AllergyType::Gluten);
        assert_eq!("حساسية السمسم".parse::<AllergyType>().unwrap(), AllergyType::Sesame);
        assert!("pollen".parse::<AllergyType>().is_err());
    }

    #[test]
    fn test_join_allergies() {
        let s = join_allergies(&[AllergyType::Egg, AllergyType::Fish]);
        assert_eq!(s, "حساسية البيض و حساسية السمك");
    }

    #[test]
    fn test_meal_type_from_makkah_clock() {
        // 05:00 UTC is 08:00 in Makkah.
        let morning = Utc.with_ymd_and_hms(2026, 5, 20, 5, 0, 0).unwrap();
        assert_eq!(MealType::for_makkah_time(morning), MealType::Breakfast);
        // 10:00 UTC is 13:00 in Makkah.
        let noon = Utc.with_ymd_and_hms(2026, 5, 20, 10, 0, 0).unwrap();
        assert_eq!(MealType::for_makkah_time(noon), MealType::Lunch);
        // 17:00 UTC is 20:00 in Makkah.
        let evening = Utc.with_ymd_and_hms(2026, 5, 20, 17, 0, 0).unwrap();
        assert_eq!(MealType::for_makkah_time(evening), MealType::Dinner);
    }

    #[test]
    fn test_meal_type_default_is_lunch() {
        assert_eq!(MealType::default(), MealType::Lunch);
        assert_eq!("عشاء".parse::<MealType>().unwrap(), MealType::Dinner);
    }

    #[test]
    fn test_parse_meal_analysis() {
        let json = r#"{
            "safetyStatus": "CAUTION",
            "explanation": "قد يحتوي على السمسم",
            "potentialAllergens": ["سمسم"],
            "alternatives": ["أرز بسمتي"],
            "safeIngredients": ["دجاج"]
        }"#;
        let a: MealAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(a.safety_status, SafetyLevel::Caution);
        assert_eq!(a.potential_allergens, vec!["سمسم"]);
    }

    #[test]
    fn test_parse_shortlist_with_budget() {
        let json = r#"{"restaurants": [{
            "name": "Al Baik", "location": "العزيزية", "safetyLevel": "آمن",
            "description": "دجاج مقلي", "budgetLevel": "اقتصادي",
            "suggestedMeals": ["بروست", "سلطة", "بطاطس"]
        }]}"#;
        let s: RestaurantShortlist = serde_json::from_str(json).unwrap();
        assert_eq!(s.restaurants.len(), 1);
        assert_eq!(s.restaurants[0].budget(), Some(BudgetLevel::Economy));
        assert_eq!(s.restaurants[0].budget().unwrap().icon(), "\u{1F4B0}");
    }

    #[test]
    fn test_off_list_budget_keeps_shortlist() {
        let json = r#"{"restaurants": [
            {"name": "Romansiah", "location": "الشوقية", "budgetLevel": "متوسط إلى فاخر"},
            {"name": "Kudu", "location": "العزيزية", "budgetLevel": "moderate"},
            {"name": "Al Tazaj", "location": "العزيزية"}
        ]}"#;
        let s: RestaurantShortlist = serde_json::from_str(json).unwrap();
        assert_eq!(s.restaurants.len(), 3);
        assert_eq!(s.restaurants[0].budget_level.as_deref(), Some("متوسط إلى فاخر"));
        assert_eq!(s.restaurants[0].budget(), None);
        assert_eq!(s.restaurants[1].budget(), Some(BudgetLevel::Moderate));
        assert_eq!(s.restaurants[2].budget(), None);
    }

    #[test]
    fn test_area_default() {
        let q = RestaurantQuery { allergies: vec![AllergyType::Nut], area: Some("  ".into()), meal_type: None };
        assert_eq!(q.area_or_default(), DEFAULT_AREA);
        assert_eq!(q.meal_type_or_default(), MealType::Lunch);
    }
}
