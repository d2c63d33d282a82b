use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::LocationQuery;
use crate::lodging::{Candidate, SourceLabel};

use super::state::AppState;

/// City used when the request names none.
pub const DEFAULT_CITY: &str = "Rome";

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    success: bool,
    error: String,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            success: false,
            error: self.1,
        };
        (self.0, Json(body)).into_response()
    }
}

// ─── GET /api/hotels/search ─────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub hotels: Vec<Candidate>,
    pub source: SourceLabel,
}

pub async fn search_hotels(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let query = LocationQuery::new(
        params.city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
        params.country.unwrap_or_default(),
    );

    let set = Arc::clone(&state.pipeline)
        .search(&state.catalog, query)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "live search worker failed");
            ApiError(StatusCode::INTERNAL_SERVER_ERROR, "Hotel search failed".to_string())
        })?;

    tracing::debug!(
        hotels = set.candidates.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "GET /api/hotels/search"
    );

    Ok(Json(SearchResponse {
        success: true,
        hotels: set.candidates,
        source: set.source,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::build_router;
    use super::*;
    use crate::config::SearchConfig;
    use crate::location::testing::FakeLookup;
    use crate::location::types::{Place, ReversePlace, SearchParams};
    use crate::location::{Coordinate, LocationError, PlaceLookup};
    use crate::lodging::testing::FakePoi;
    use crate::lodging::{SearchPipeline, StaticCatalog};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    struct PanickingLookup;

    impl PlaceLookup for PanickingLookup {
        fn search(&self, _query: &str, _params: SearchParams) -> Result<Vec<Place>, LocationError> {
            panic!("lookup exploded");
        }

        fn reverse(&self, _at: Coordinate, _timeout: Duration) -> Result<ReversePlace, LocationError> {
            panic!("lookup exploded");
        }
    }

    fn app(lookup: impl PlaceLookup + 'static, poi: FakePoi) -> axum::Router {
        let pipeline = SearchPipeline::new(Arc::new(lookup), Arc::new(poi), SearchConfig::default());
        build_router(Arc::new(AppState::new(StaticCatalog::build(), pipeline)))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    #[tokio::test]
    async fn test_unresolved_city_serves_catalog() {
        let (status, json) = get(app(FakeLookup::default(), FakePoi::default()), "/api/hotels/search?city=Paris&country=France").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "static-only");
        assert_eq!(json["hotels"][0]["id"], "basic-paris-1");
    }

    #[tokio::test]
    async fn test_live_results_topped_up() {
        let lookup = FakeLookup::default()
            .with_search("Paris,France", json!([{ "lat": "48.85", "lon": "2.35" }]));
        let poi = FakePoi::default().with_lodging(json!([
            { "type": "node", "id": 5, "lat": 48.86, "lon": 2.34, "tags": { "name": "Hôtel du Louvre", "stars": "5" } }
        ]));
        let (status, json) = get(app(lookup, poi), "/api/hotels/search?city=Paris&country=France").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["source"], "live+static");
        let hotels = json["hotels"].as_array().unwrap();
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0]["id"], "osm-node-5");
        assert_eq!(hotels[0]["stars"], 5);
        assert_eq!(hotels[0]["leed"], true);
        assert_eq!(hotels[1]["id"], "basic-paris-1");
    }

    #[tokio::test]
    async fn test_city_defaults_to_rome() {
        let lookup = Arc::new(FakeLookup::default());
        let pipeline = SearchPipeline::new(lookup.clone(), Arc::new(FakePoi::default()), SearchConfig::default());
        let router = build_router(Arc::new(AppState::new(StaticCatalog::build(), pipeline)));

        let (status, json) = get(router, "/api/hotels/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["source"], "static-only");
        assert!(lookup.searched().iter().any(|q| q == "Rome"));
    }

    #[tokio::test]
    async fn test_worker_panic_is_500() {
        let (status, json) = get(app(PanickingLookup, FakePoi::default()), "/api/hotels/search?city=Paris&country=France").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_cors_is_permissive() {
        let response = app(FakeLookup::default(), FakePoi::default())
            .oneshot(
                Request::builder()
                    .uri("/api/hotels/search?city=Tokyo")
                    .header("origin", "https://example.org")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
