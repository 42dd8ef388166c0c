// ABOUTME: Router assembly for the GiveLink server
// ABOUTME: Mounts health and domain routes, then wraps them in tracing, CORS and security layers

pub mod health;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use givelink_api::{create_api_router, AppState, ADMIN_TOKEN_HEADER};

use crate::config::Config;
use crate::middleware::{create_panic_handler, SecurityHeadersLayer};

/// Build the full application router
pub fn create_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ])
        .allow_credentials(true);

    let health = Router::new()
        .route("/api/health", get(health::health_check))
        .with_state(state.clone());

    let mut app = Router::new()
        .merge(health)
        .merge(create_api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    if config.security_headers_enabled {
        app = app.layer(SecurityHeadersLayer::new().with_hsts(config.enable_hsts));
    }

    Ok(app.layer(create_panic_handler()))
}
