mod handlers;
mod state;

pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/locations", get(handlers::locations))
        .route("/api/locations/search", get(handlers::search))
        .route("/api/locations/resolve", get(handlers::resolve))
        .route("/api/map", get(handlers::map_overview))
        .route("/api/allergies", get(handlers::allergies))
        .route("/api/meals/analyze", post(handlers::analyze_meal))
        .route("/api/restaurants/recommend", post(handlers::recommend))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn start(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind to {}: {}", addr, e))?;

    tracing::info!("Safe Meal server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::testing::{FakeModel, MEAL_REPLY, SHORTLIST_REPLY};
    use crate::advisor::Advisor;
    use crate::registry::Registry;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(reply: Option<&str>) -> Router {
        build_router(AppState {
            registry: Arc::new(Registry::builtin().unwrap()),
            advisor: reply.map(|r| Arc::new(Advisor::new(FakeModel::new(r)))),
        })
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = call(app(None), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["restaurants"], 15);
        assert_eq!(json["advisor"], false);
    }

    #[tokio::test]
    async fn test_locations_list() {
        let (status, json) = call(app(None), get("/api/locations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 15);
        assert_eq!(json[5]["matchName"], "Al Baik (البيك)");
    }

    #[tokio::test]
    async fn test_search_suggestions() {
        let (status, json) = call(app(None), get("/api/locations/search?q=kudu")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "Kudu (كودو)");
    }

    #[tokio::test]
    async fn test_search_without_query_is_empty() {
        let (_, json) = call(app(None), get("/api/locations/search")).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_registry_hit() {
        let (status, json) = call(app(None), get("/api/locations/resolve?name=al%20baik")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "registry");
        assert_eq!(json["popup"], "Al Baik (البيك - الحرم)");
        assert_eq!(json["tier"], "name_contains_query");
        assert_eq!(json["zoom"], 16);
    }

    #[tokio::test]
    async fn test_resolve_fallback() {
        let (status, json) = call(app(None), get("/api/locations/resolve?name=Unknown%20Grill")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "external_search");
        assert!(json["url"].as_str().unwrap().contains("Unknown%20Grill"));
    }

    #[tokio::test]
    async fn test_resolve_requires_name() {
        let (status, json) = call(app(None), get("/api/locations/resolve?name=%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 400);
    }

    #[tokio::test]
    async fn test_map_overview() {
        let (_, json) = call(app(None), get("/api/map")).await;
        assert_eq!(json["view"]["zoom"], 13);
        assert_eq!(json["markers"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_allergies() {
        let (_, json) = call(app(None), get("/api/allergies")).await;
        assert_eq!(json.as_array().unwrap().len(), 8);
        assert_eq!(json[0]["id"], "gluten");
    }

    #[tokio::test]
    async fn test_analyze_without_advisor_is_unavailable() {
        let body = serde_json::json!({ "mealName": "كبسة", "allergies": ["nut"] });
        let (status, _) = call(app(None), post_json("/api/meals/analyze", body)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_analyze_meal() {
        let body = serde_json::json!({ "mealName": "ساتيه", "allergies": ["peanut"] });
        let (status, json) = call(app(Some(MEAL_REPLY)), post_json("/api/meals/analyze", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["safetyStatus"], "UNSAFE");
    }

    #[tokio::test]
    async fn test_analyze_meal_without_allergies() {
        let body = serde_json::json!({ "mealName": "كبسة", "allergies": [] });
        let (status, _) = call(app(Some(MEAL_REPLY)), post_json("/api/meals/analyze", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend() {
        let body = serde_json::json!({ "allergies": ["gluten"], "area": "حي العزيزية", "mealType": "dinner" });
        let (status, json) = call(app(Some(SHORTLIST_REPLY)), post_json("/api/restaurants/recommend", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["area"], "حي العزيزية");
        assert_eq!(json["mealType"], "dinner");
        assert_eq!(json["restaurants"][0]["mapTarget"]["kind"], "registry");
        assert_eq!(json["restaurants"][1]["mapTarget"]["kind"], "external_search");
        assert_eq!(json["restaurants"][0]["budgetLevel"], "اقتصادي");
    }

    #[tokio::test]
    async fn test_recommend_bad_model_output() {
        let body = serde_json::json!({ "allergies": ["egg"] });
        let (status, json) = call(app(Some("nonsense")), post_json("/api/restaurants/recommend", body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], 502);
    }
}
