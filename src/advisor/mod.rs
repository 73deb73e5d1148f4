//! Recommendation service: meal safety checks and restaurant shortlists.
//!
//! The reasoning happens in an external generative model. This module builds
//! the prompts, calls the model through the [`LanguageModel`] seam, parses the
//! JSON it returns, and caches text-only answers on disk.

pub mod cache;
pub mod gemini;
pub mod greetings;
pub mod prompts;
pub mod types;

pub use cache::ResponseCache;
pub use gemini::GeminiClient;
pub use types::{
    AllergyType, BudgetLevel, MealAnalysis, MealQuery, MealType, Restaurant, RestaurantQuery,
    RestaurantShortlist, SafetyLevel,
};

use crate::mapping::{self, MapTarget};
use crate::registry::Registry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Recommendation service errors.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("no API key configured; set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model returned no candidates")]
    EmptyResponse,

    #[error("cannot parse model output: {0}")]
    InvalidResponse(String),
}

/// One call to the generative model.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system_instruction: Option<String>,
    pub text: String,
    /// Base64 JPEG without any `data:` prefix.
    pub image_base64: Option<String>,
    pub response_schema: Option<Value>,
}

/// A generative model that answers with JSON text.
pub trait LanguageModel: Send + Sync {
    fn generate(&self, request: &ModelRequest) -> Result<String, AdvisorError>;
}

/// A restaurant suggestion with everything needed to show it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRestaurant {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub map_target: MapTarget,
    pub maps_url: String,
    pub photos_url: String,
}

/// Answer to a restaurant search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub greeting: &'static str,
    pub area: String,
    pub meal_type: MealType,
    pub restaurants: Vec<RecommendedRestaurant>,
}

/// Front door to the recommendation service.
pub struct Advisor {
    model: Arc<dyn LanguageModel>,
    cache: Option<Mutex<ResponseCache>>,
}

impl Advisor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model, cache: None }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(Mutex::new(cache));
        self
    }

    /// Judge whether a meal is safe for the given allergies.
    pub fn analyze_meal(&self, query: &MealQuery) -> Result<MealAnalysis, AdvisorError> {
        if query.allergies.is_empty() {
            return Err(AdvisorError::InvalidRequest("select at least one allergy".into()));
        }
        let image = query
            .image
            .as_deref()
            .map(prompts::strip_data_url)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if query.meal_name.trim().is_empty() && image.is_none() {
            return Err(AdvisorError::InvalidRequest("provide a meal name or a photo".into()));
        }

        let request = ModelRequest {
            system_instruction: Some(prompts::meal_system_instruction(query)),
            text: prompts::meal_user_text(query, image.is_some()),
            image_base64: image.map(str::to_string),
            response_schema: Some(prompts::meal_response_schema()),
        };

        // Photos are never cached.
        let key = image.is_none().then(|| cache::meal_key(query));
        let analysis: MealAnalysis = self.generate_parsed(key, &request, parse_json)?;
        tracing::info!(
            meal = query.meal_name.trim(),
            verdict = %analysis.safety_status,
            with_image = image.is_some(),
            "meal analysed"
        );
        Ok(analysis)
    }

    /// Ask the model for restaurants that suit the allergies.
    pub fn find_restaurants(&self, query: &RestaurantQuery) -> Result<RestaurantShortlist, AdvisorError> {
        if query.allergies.is_empty() {
            return Err(AdvisorError::InvalidRequest("select at least one allergy".into()));
        }
        let request = ModelRequest {
            system_instruction: None,
            text: prompts::restaurant_prompt(query),
            image_base64: None,
            response_schema: None,
        };
        let shortlist = self.generate_parsed(Some(cache::restaurant_key(query)), &request, |text| {
            if text.trim().is_empty() {
                Ok(RestaurantShortlist::default())
            } else {
                parse_json(text)
            }
        })?;
        tracing::info!(
            area = query.area_or_default(),
            meal = %query.meal_type_or_default(),
            count = shortlist.restaurants.len(),
            "restaurants suggested"
        );
        Ok(shortlist)
    }

    /// Restaurant search plus map targeting and a greeting for the user.
    pub fn recommend(&self, registry: &Registry, query: &RestaurantQuery) -> Result<Recommendation, AdvisorError> {
        let shortlist = self.find_restaurants(query)?;
        Ok(Recommendation {
            greeting: greetings::pick(),
            area: query.area_or_default().to_string(),
            meal_type: query.meal_type_or_default(),
            restaurants: shortlist
                .restaurants
                .into_iter()
                .map(|r| annotate(registry, r))
                .collect(),
        })
    }

    /// Ask the model, going through the cache when `key` is set. Only text
    /// that `parse` accepts is stored, and a stored entry that no longer
    /// parses is treated as a miss.
    fn generate_parsed<T>(
        &self,
        key: Option<String>,
        request: &ModelRequest,
        parse: impl Fn(&str) -> Result<T, AdvisorError>,
    ) -> Result<T, AdvisorError> {
        let cache = self.cache.as_ref().zip(key.as_deref());

        if let Some((cache, key)) = cache {
            if let Some(hit) = lock(cache).get(key) {
                match parse(&hit) {
                    Ok(value) => {
                        tracing::debug!(key, "model response served from cache");
                        return Ok(value);
                    }
                    Err(e) => tracing::warn!(key, "ignoring unreadable cache entry: {}", e),
                }
            }
        }

        let text = self.model.generate(request)?;
        let value = parse(&text)?;

        if let Some((cache, key)) = cache {
            if !text.trim().is_empty() {
                lock(cache).put(key, &text);
            }
        }
        Ok(value)
    }
}

fn lock(cache: &Mutex<ResponseCache>) -> std::sync::MutexGuard<'_, ResponseCache> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn annotate(registry: &Registry, restaurant: Restaurant) -> RecommendedRestaurant {
    let area = restaurant.location.trim();
    let map_target = mapping::target_with_context(registry, &restaurant.name, Some(area));
    let maps_url = restaurant.maps_uri.clone().unwrap_or_else(|| {
        mapping::search_url(&format!("{} {} makkah", restaurant.name.trim(), area))
    });
    let photos_url = mapping::photos_url(&restaurant.name, area);
    RecommendedRestaurant { restaurant, map_target, maps_url, photos_url }
}

/// Parse model JSON, tolerating a ```json fenced block.
fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, AdvisorError> {
    let body = text.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|b| b.strip_suffix("```"))
        .unwrap_or(body)
        .trim();
    serde_json::from_str(body).map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
}
