// ABOUTME: HTTP API layer for GiveLink providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub mod accounts_handlers;
pub mod admin_handlers;
pub mod auth;
pub mod donations_handlers;
pub mod requests_handlers;
pub mod response;
pub mod state;

pub use auth::{AdminAccess, CurrentUser, ADMIN_TOKEN_HEADER, SESSION_COOKIE_NAME};
pub use response::{ApiError, ApiResponse, ApiResult};
pub use state::{AppState, AuthSettings};

/// Creates the donor account router
pub fn create_donors_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(accounts_handlers::donor_signup))
        .route("/signin", post(accounts_handlers::donor_signin))
        .route("/logout", post(accounts_handlers::logout))
}

/// Creates the receiver account router
pub fn create_receivers_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(accounts_handlers::receiver_signup))
        .route("/signin", post(accounts_handlers::receiver_signin))
        .route("/logout", post(accounts_handlers::logout))
}

/// Creates the session token router
pub fn create_token_router() -> Router<AppState> {
    Router::new().route("/details", get(accounts_handlers::token_details))
}

/// Creates the requests API router
pub fn create_requests_router() -> Router<AppState> {
    Router::new()
        .route("/", post(requests_handlers::create_request))
        .route("/", get(requests_handlers::list_active_requests))
        .route("/{id}", get(requests_handlers::get_request))
        .route("/{id}", delete(requests_handlers::delete_request))
        .route(
            "/requestor/{requestor_id}",
            get(requests_handlers::list_by_requestor),
        )
}

/// Creates the donations API router
pub fn create_donations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(donations_handlers::create_donation))
        .route("/", get(donations_handlers::list_donations))
        .route("/{id}", get(donations_handlers::get_donation))
        .route(
            "/{id}/status",
            patch(donations_handlers::update_donation_status),
        )
        .route("/donor/{donor_id}", get(donations_handlers::list_by_donor))
}

/// Creates the admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_handlers::dashboard))
        .route("/history", get(admin_handlers::history))
        .route("/matched", get(admin_handlers::matched))
        .route("/requests", get(admin_handlers::requests))
        .route(
            "/donations/{id}/status",
            patch(admin_handlers::update_donation_status),
        )
        .route(
            "/requests/{id}/status",
            patch(admin_handlers::update_request_status),
        )
}

/// All `/api` routes bound to `state`
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/donors", create_donors_router())
        .nest("/api/receivers", create_receivers_router())
        .nest("/api/token", create_token_router())
        .nest("/api/requests", create_requests_router())
        .nest("/api/donations", create_donations_router())
        .nest("/api/admin", create_admin_router())
        .with_state(state)
}
