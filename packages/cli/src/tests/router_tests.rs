use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use givelink_api::{AppState, AuthSettings};
use givelink_storage::connect_in_memory;

use crate::api::create_router;
use crate::config::Config;

async fn app(config: &Config) -> Router {
    let pool = connect_in_memory().await.unwrap();
    let state = AppState::new(
        pool,
        AuthSettings {
            jwt_secret: "router-test-secret".to_string(),
            admin_token: None,
            secure_cookies: false,
        },
    );
    create_router(state, config).unwrap()
}

fn config(vars: &[(&str, &str)]) -> Config {
    Config::from_lookup(|name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    })
    .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app(&config(&[])).await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "givelink");
    assert_eq!(body["database"], "ok");
    assert!(body["timestamp"].as_i64().unwrap() > 1_577_836_800);
}

#[tokio::test]
async fn test_security_headers_can_be_disabled() {
    let app = app(&config(&[("SECURITY_HEADERS_ENABLED", "false")])).await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().get("x-content-type-options").is_none());
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = app(&config(&[("CORS_ORIGIN", "https://givelink.example")])).await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/donations")
        .header(header::ORIGIN, "https://givelink.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://givelink.example"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_domain_routes_are_mounted() {
    let app = app(&config(&[])).await;
    let response = app
        .oneshot(Request::builder().uri("/api/requests").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_invalid_cors_origin_is_an_error() {
    let pool = connect_in_memory().await.unwrap();
    let state = AppState::new(pool, AuthSettings::default());
    let config = config(&[("CORS_ORIGIN", "bad\norigin")]);
    assert!(create_router(state, &config).is_err());
}
