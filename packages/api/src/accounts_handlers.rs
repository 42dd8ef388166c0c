// ABOUTME: HTTP request handlers for donor and receiver accounts
// ABOUTME: Sign-up, sign-in with session cookies, logout and token inspection

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use givelink_auth::{Credentials, DonorSignup, ReceiverSignup, Role};

use crate::auth::{clear_session_cookie, session_cookie, CurrentUser};
use crate::response::{created, ok, ApiResponse, ApiResult};
use crate::state::AppState;

/// Signed-in account together with its session token
#[derive(Serialize)]
pub struct SessionResponse<T> {
    pub role: Role,
    pub user: T,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub role: Role,
    pub user_id: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a donor
pub async fn donor_signup(
    State(state): State<AppState>,
    Json(signup): Json<DonorSignup>,
) -> ApiResult<impl IntoResponse> {
    info!("Donor sign-up");
    let donor = state.account_storage.create_donor(signup).await?;
    Ok(created(donor))
}

/// Sign a donor in and set the session cookie
pub async fn donor_signin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Response> {
    info!("Donor sign-in");
    let donor = state.account_storage.authenticate_donor(&credentials).await?;
    let token = state.tokens.issue(&donor.id, Role::Donor)?;
    start_session(&state, Role::Donor, donor, token)
}

/// Register a receiver
pub async fn receiver_signup(
    State(state): State<AppState>,
    Json(signup): Json<ReceiverSignup>,
) -> ApiResult<impl IntoResponse> {
    info!("Receiver sign-up");
    let receiver = state.account_storage.create_receiver(signup).await?;
    Ok(created(receiver))
}

/// Sign a receiver in and set the session cookie
pub async fn receiver_signin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Response> {
    info!("Receiver sign-in");
    let receiver = state
        .account_storage
        .authenticate_receiver(&credentials)
        .await?;
    let token = state.tokens.issue(&receiver.id, Role::Receiver)?;
    start_session(&state, Role::Receiver, receiver, token)
}

/// Clear the session cookie
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = clear_session_cookie(state.secure_cookies)?;
    let body = ApiResponse::success(MessageResponse {
        message: "Logged out successfully".to_string(),
    });
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Role and account id of the presented session
pub async fn token_details(user: CurrentUser) -> impl IntoResponse {
    ok(TokenDetails {
        role: user.role,
        user_id: user.id,
    })
}

fn start_session<T: Serialize>(
    state: &AppState,
    role: Role,
    user: T,
    token: String,
) -> ApiResult<Response> {
    let cookie = session_cookie(&token, state.tokens.ttl_seconds(), state.secure_cookies)?;
    let body = ApiResponse::success(SessionResponse { role, user, token });
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
