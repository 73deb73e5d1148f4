//! Prompt construction and response schemas.

use super::types::{join_allergies, MealQuery, RestaurantQuery};
use serde_json::{json, Value};

/// Number of restaurants requested per search.
pub const SHORTLIST_SIZE: usize = 3;

pub fn meal_system_instruction(query: &MealQuery) -> String {
    format!(
        "أنت خبير تغذية وسلامة غذائية للحجاج في مكة.\n\
         يجب عليك تحليل الوجبة (سواء من الاسم أو الصورة) بالنسبة لشخص يعاني من الحساسيات التالية: \"{}\".\n\
         قم بتقييم الوجبة بناءً على المكونات الشائعة فيها واحتمالية وجود تلوث خلطي.\n\
         جاوب باللغة العربية بتنسيق JSON حصراً.",
        join_allergies(&query.allergies)
    )
}

/// User text accompanying the meal. Wording differs when a photo is attached.
pub fn meal_user_text(query: &MealQuery, with_image: bool) -> String {
    let allergies = join_allergies(&query.allergies);
    let name = query.meal_name.trim();
    if with_image {
        format!(
            "هذه صورة للوجبة. الاسم المقترح: \"{}\". حلل الصورة بحثاً عن مسببات الحساسية لـ: {}.",
            name, allergies
        )
    } else {
        format!("قم بتحليل الوجبة التالية: \"{}\" ومدى ملاءمتها لحساسية: {}", name, allergies)
    }
}

pub fn meal_response_schema() -> Value {
    let string_array = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "safetyStatus": { "type": "STRING", "enum": ["SAFE", "CAUTION", "UNSAFE"] },
            "explanation": { "type": "STRING" },
            "potentialAllergens": string_array,
            "safeIngredients": string_array,
            "alternatives": string_array,
        },
        "required": ["safetyStatus", "explanation", "potentialAllergens", "alternatives", "safeIngredients"]
    })
}

pub fn restaurant_prompt(query: &RestaurantQuery) -> String {
    format!(
        "أنت دليل غذائي خبير للحجاج في مكة المكرمة.\n\
         اقترح أفضل {count} مطاعم {meal} في منطقة {area} بمكة المكرمة.\n\
         يجب أن تكون هذه المطاعم معروفة بمراعاتها لمعايير النظافة وتناسب الأشخاص الذين يعانون من: [{allergies}].\n\
         \n\
         قم بتوفير النتائج بتنسيق JSON حصراً يحتوي على مصفوفة \"restaurants\" مع الحقول التالية لكل مطعم:\n\
         - name: اسم المطعم\n\
         - location: اسم الحي أو المنطقة في مكة\n\
         - safetyLevel: وصف لمستوى الأمان بالنسبة للحساسية المذكورة\n\
         - description: وصف قصير للمطعم وما يميزه\n\
         - budgetLevel: (اقتصادي، متوسط، أو فاخر)\n\
         - suggestedMeals: (مصفوفة من 3 وجبات آمنة مقترحة)",
        count = SHORTLIST_SIZE,
        meal = query.meal_type_or_default().label_ar(),
        area = query.area_or_default(),
        allergies = join_allergies(&query.allergies),
    )
}

/// Strip a `data:image/...;base64,` prefix if present.
pub fn strip_data_url(image: &str) -> &str {
    match image.split_once(',') {
        Some((head, body)) if head.starts_with("data:") => body,
        _ => image,
    }
}
