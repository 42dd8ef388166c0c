// ABOUTME: Authentication context for API requests
// ABOUTME: Session extractor, role checks, admin token gate and session cookie helpers

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use tracing::warn;

use givelink_auth::{constant_time_eq, Role};

use crate::response::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "token";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Account behind the presented session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    /// Fail with 403 unless the session belongs to `role`.
    pub fn require(self, role: Role) -> Result<Self, ApiError> {
        if self.role != role {
            return Err(ApiError::Forbidden(format!(
                "Only {} accounts can do this",
                role.as_str()
            )));
        }
        Ok(self)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let claims = state.tokens.verify(&token)?;
        Ok(Self {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Proof that the request carried the configured admin token
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Err(ApiError::Forbidden(
                "Admin access is not configured".to_string(),
            ));
        };

        let provided = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        if !constant_time_eq(provided, expected) {
            warn!(audit = true, "Rejected admin request with invalid token");
            return Err(ApiError::Forbidden("Invalid admin token".to_string()));
        }

        Ok(AdminAccess)
    }
}

/// Session token from the `token` cookie, falling back to a bearer header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string());
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub fn session_cookie(token: &str, max_age: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    cookie_header(
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE_NAME, token, max_age
        ),
        secure,
    )
}

pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, ApiError> {
    cookie_header(
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
            SESSION_COOKIE_NAME
        ),
        secure,
    )
}

fn cookie_header(mut cookie: String, secure: bool) -> Result<HeaderValue, ApiError> {
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.into()))
}
