//! Request-level tests driving the router through `tower::ServiceExt::oneshot`.

use alicuota_core::{AlicuotaService, Dataset, GENERAL_CASE_OPTION};
use alicuota_data::DatasetLoader;
use alicuota_server::build_router;
use alicuota_server::routes::MISSING_FILTER_NAME;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

const SAMPLE: &str = "\
provincia,year,actividad,subactividad,subsubactividad,alicuota,monto_fijo,montomodulo,valormodulo,umbral_desde,umbral_hasta,monto_min,monto_max
CABA,2024,.,Comercio,.,0.01,.,.,.,.,.,.,.
CABA,2024,.,Inmuebles,.,0.035,.,.,.,.,.,.,.
Córdoba,2024,Seguros,.,.,.,500,.,.,.,.,.,.
Córdoba,2024,Bancos,Préstamos,.,0.005,.,.,.,0,100000,.,.
Córdoba,2024,Bancos,Préstamos,.,0.01,.,.,.,100000,.,.,.
";

fn app() -> Router {
    let dataset = DatasetLoader::parse(SAMPLE.as_bytes()).expect("sample should parse");
    build_router(AlicuotaService::from(dataset))
}

async fn post_json(
    app: Router,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");

    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}

#[tokio::test]
async fn test_health_reports_row_count() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "ok", "rows": 5 }));
}

#[tokio::test]
async fn test_options_lists_provinces() {
    let (status, body) = post_json(
        app(),
        "/api/options",
        json!({ "filter_name": "provincia", "filters": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "options": ["CABA", "Córdoba"] }));
}

#[tokio::test]
async fn test_options_without_filters_field() {
    let (status, body) = post_json(app(), "/api/options", json!({ "filter_name": "year" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "options": ["2024"] }));
}

#[tokio::test]
async fn test_options_offers_general_case() {
    let (_, body) = post_json(
        app(),
        "/api/options",
        json!({
            "filter_name": "subactividad",
            "filters": { "provincia": "Córdoba", "year": 2024, "actividad": "Seguros" }
        }),
    )
    .await;

    assert_eq!(body, json!({ "options": [GENERAL_CASE_OPTION] }));
}

#[tokio::test]
async fn test_options_missing_filter_name_is_bad_request() {
    for payload in [json!({ "filters": {} }), json!({ "filter_name": "  " })] {
        let (status, body) = post_json(app(), "/api/options", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": MISSING_FILTER_NAME }));
    }
}

#[tokio::test]
async fn test_options_unknown_field_is_empty() {
    let (status, body) = post_json(
        app(),
        "/api/options",
        json!({ "filter_name": "colour", "filters": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "options": [] }));
}

#[tokio::test]
async fn test_rate_single() {
    let (status, body) = post_json(
        app(),
        "/api/alicuota",
        json!({ "provincia": "CABA", "year": "2024", "subactividad": "Inmuebles" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_eq!(result["status"], "ok");
    let rate = result["rate_fraction"].as_f64().expect("numeric rate");
    assert!((rate - 0.035).abs() < 1e-12);
    assert_eq!(result["amount_min"].as_f64(), Some(0.0));
    assert_eq!(result["amount_max"], Value::Null);
    assert!(result.get("additional_fixed_charge").is_none());
}

#[tokio::test]
async fn test_rate_fixed_fee() {
    let (_, body) = post_json(
        app(),
        "/api/alicuota",
        json!({ "provincia": "Córdoba", "year": 2024, "actividad": "Seguros" }),
    )
    .await;

    let result = &body["result"];
    assert_eq!(result["status"], "fixed");
    assert_eq!(result["fixed_amount"].as_f64(), Some(500.0));
    assert_eq!(result["description"], "Fixed amount determined: $500");
}

#[tokio::test]
async fn test_rate_brackets_keep_null_bounds() {
    let (_, body) = post_json(
        app(),
        "/api/alicuota",
        json!({
            "provincia": "Córdoba",
            "year": 2024,
            "actividad": "Bancos",
            "subactividad": "Préstamos"
        }),
    )
    .await;

    let result = &body["result"];
    assert_eq!(result["status"], "varies");
    let brackets = result["brackets"].as_array().expect("bracket list");
    assert_eq!(brackets.len(), 2);
    assert_eq!(brackets[0]["threshold_from"].as_f64(), Some(0.0));
    assert_eq!(brackets[1]["threshold_to"], Value::Null);
}

#[tokio::test]
async fn test_rate_accepts_boolean_filter_values() {
    let (status, body) = post_json(
        app(),
        "/api/alicuota",
        json!({ "provincia": "CABA", "year": 2024, "subactividad": "Inmuebles", "actividad": false }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "error");
}

#[tokio::test]
async fn test_alias_and_canonical_keys_resolve_alike() {
    let filters = json!({ "province": "Córdoba", "provincia": "CABA", "year": 2024 });

    let (_, options) = post_json(
        app(),
        "/api/options",
        json!({ "filter_name": "subactividad", "filters": filters }),
    )
    .await;
    let (_, rate) = post_json(
        app(),
        "/api/alicuota",
        json!({ "province": "Córdoba", "provincia": "CABA", "year": 2024, "subactividad": "Comercio" }),
    )
    .await;

    assert_eq!(options, json!({ "options": ["Comercio", "Inmuebles"] }));
    assert_eq!(rate["result"]["status"], "ok");
}

#[tokio::test]
async fn test_rate_without_year_is_error_outcome() {
    let (status, body) = post_json(app(), "/api/alicuota", json!({ "provincia": "CABA" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "result": { "status": "error", "message": "Province and year are required." } })
    );
}

#[tokio::test]
async fn test_rate_on_empty_dataset_is_error_outcome() {
    let app = build_router(AlicuotaService::from(Dataset::empty()));

    let (status, body) = post_json(
        app,
        "/api/alicuota",
        json!({ "provincia": "CABA", "year": 2024 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "error");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}
