//! HTTP routes over [`AlicuotaService`].

use alicuota_core::{AlicuotaService, FilterSelection, RateOutcome};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

pub const MISSING_FILTER_NAME: &str = "Missing 'filter_name'.";

#[derive(Debug, Default, Deserialize)]
pub struct OptionsRequest {
    #[serde(default)]
    pub filter_name: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterSelection>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub result: RateOutcome,
}

pub fn build_router(service: AlicuotaService) -> Router {
    Router::new()
        .route("/api/options", post(options_handler))
        .route("/api/alicuota", post(rate_handler))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(service)
}

async fn options_handler(
    State(service): State<AlicuotaService>,
    Json(request): Json<OptionsRequest>,
) -> Response {
    let Some(filter_name) = request
        .filter_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": MISSING_FILTER_NAME })))
            .into_response();
    };

    let filters = request.filters.unwrap_or_default();
    debug!(filter_name, ?filters, "options request");

    let options = service.filter_options(filter_name, &filters);
    Json(OptionsResponse { options }).into_response()
}

async fn rate_handler(
    State(service): State<AlicuotaService>,
    Json(filters): Json<FilterSelection>,
) -> Json<RateResponse> {
    debug!(?filters, "rate request");
    Json(RateResponse {
        result: service.rate(&filters),
    })
}

async fn health_check(State(service): State<AlicuotaService>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "rows": service.dataset().len(),
    }))
}
