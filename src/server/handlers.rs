use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::advisor::{Advisor, AdvisorError, AllergyType, MealAnalysis, MealQuery, MealType, Recommendation, RestaurantQuery};
use crate::mapping::{self, MapOverview, MapTarget};
use crate::registry::{Category, LocationEntry};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        let status = match &e {
            AdvisorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AdvisorError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            AdvisorError::Network(_)
            | AdvisorError::Api { .. }
            | AdvisorError::EmptyResponse
            | AdvisorError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    }
}

fn advisor(state: &AppState) -> Result<Arc<Advisor>, ApiError> {
    state
        .advisor
        .clone()
        .ok_or_else(|| AdvisorError::MissingApiKey.into())
}

// ─── GET /api/health ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
    restaurants: usize,
    advisor: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        restaurants: state.registry.len(),
        advisor: state.advisor.is_some(),
    })
}

// ─── GET /api/locations ──────────────────────────────────────────

pub async fn locations(State(state): State<Arc<AppState>>) -> Json<Vec<LocationEntry>> {
    Json(state.registry.all().to_vec())
}

// ─── GET /api/locations/search ───────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct Suggestion {
    pub name: String,
    pub category: Category,
    pub label: &'static str,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Suggestion>> {
    let q = params.q.as_deref().unwrap_or("");
    let hits: Vec<Suggestion> = state
        .registry
        .search(q)
        .into_iter()
        .map(|e| Suggestion {
            name: e.name.clone(),
            category: e.category,
            label: e.category.label(),
        })
        .collect();
    tracing::debug!(query = q, hits = hits.len(), "location search");
    Json(hits)
}

// ─── GET /api/locations/resolve ──────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub name: Option<String>,
    pub area: Option<String>,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<MapTarget>, ApiError> {
    let name = params.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'name' parameter"));
    }
    let target = mapping::target_with_context(&state.registry, name, params.area.as_deref());
    tracing::info!(name, found = target.is_registry(), "GET /api/locations/resolve");
    Ok(Json(target))
}

// ─── GET /api/map ────────────────────────────────────────────────

pub async fn map_overview(State(state): State<Arc<AppState>>) -> Json<MapOverview> {
    Json(mapping::overview(&state.registry))
}

// ─── GET /api/allergies ──────────────────────────────────────────

#[derive(Serialize)]
pub struct AllergyOption {
    pub id: AllergyType,
    pub label: &'static str,
}

pub async fn allergies() -> Json<Vec<AllergyOption>> {
    Json(
        AllergyType::ALL
            .iter()
            .map(|&a| AllergyOption { id: a, label: a.label_ar() })
            .collect(),
    )
}

// ─── POST /api/meals/analyze ─────────────────────────────────────

pub async fn analyze_meal(
    State(state): State<Arc<AppState>>,
    Json(query): Json<MealQuery>,
) -> Result<Json<MealAnalysis>, ApiError> {
    let start = Instant::now();
    let advisor = advisor(&state)?;
    let analysis = tokio::task::spawn_blocking(move || advisor.analyze_meal(&query))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("analysis task failed: {}", e)))??;

    tracing::info!(
        verdict = %analysis.safety_status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "POST /api/meals/analyze"
    );
    Ok(Json(analysis))
}

// ─── POST /api/restaurants/recommend ─────────────────────────────

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(mut query): Json<RestaurantQuery>,
) -> Result<Json<Recommendation>, ApiError> {
    let start = Instant::now();
    let advisor = advisor(&state)?;
    if query.meal_type.is_none() {
        query.meal_type = Some(MealType::for_makkah_time(Utc::now()));
    }

    let registry = state.registry.clone();
    let recommendation = tokio::task::spawn_blocking(move || advisor.recommend(&registry, &query))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("search task failed: {}", e)))??;

    tracing::info!(
        area = %recommendation.area,
        count = recommendation.restaurants.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "POST /api/restaurants/recommend"
    );
    Ok(Json(recommendation))
}
