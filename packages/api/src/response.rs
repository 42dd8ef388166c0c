// ABOUTME: Shared API response types and error handling
// ABOUTME: Success envelope plus an error type that maps domain failures to status codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use givelink_auth::AuthError;
use givelink_donations::DonationError;
use givelink_matching::MatchError;
use givelink_storage::StorageError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 200 with the success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 201 with the success envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<DonationError> for ApiError {
    fn from(err: DonationError) -> Self {
        match err {
            DonationError::Match(e) => ApiError::Match(e),
            DonationError::Storage(e) => ApiError::Storage(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<&'static str, String>>,
}

fn storage_status(err: &StorageError) -> (StatusCode, &'static str) {
    match err {
        StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        StorageError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        StorageError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        StorageError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        StorageError::Io(_)
        | StorageError::Migration(_)
        | StorageError::Sqlx(_)
        | StorageError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    }
}

fn storage_message(err: &StorageError) -> String {
    match err {
        StorageError::Conflict(msg) | StorageError::InvalidInput(msg) => msg.clone(),
        other => other.to_string(),
    }
}

impl ApiError {
    /// HTTP status and machine-readable error code
    pub fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Match(e) => (StatusCode::BAD_REQUEST, e.code()),
            ApiError::Storage(e) => storage_status(e),
            ApiError::Auth(e) => match e {
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
                AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
                AuthError::EmailTaken(_) => (StatusCode::CONFLICT, "EMAIL_TAKEN"),
                AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                AuthError::Storage(e) => storage_status(e),
                AuthError::TokenSigning(_) | AuthError::Hashing(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message safe to show to callers; server faults never leak their cause.
    fn to_user_message(&self) -> String {
        if self.to_status_and_code().0.is_server_error() {
            return "An internal server error occurred".to_string();
        }
        match self {
            ApiError::Storage(e) | ApiError::Auth(AuthError::Storage(e)) => storage_message(e),
            ApiError::Auth(AuthError::Validation(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<BTreeMap<&'static str, String>> {
        match self {
            ApiError::Match(e) => {
                let details = e.details();
                (!details.is_empty()).then(|| details.into_iter().collect())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.to_status_and_code();

        if status.is_server_error() {
            error!(
                request_id = %request_id,
                error = %self,
                "Internal server error occurred"
            );
        } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(request_id = %request_id, code = code, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.to_user_message(),
                details: self.details(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use givelink_core::Category;

    #[test]
    fn test_match_errors_are_bad_requests_with_details() {
        let err = ApiError::from(MatchError::QuantityExceedsRequest {
            category: Category::Foods,
            item: "rice".to_string(),
            requested: 2,
            attempted: 5,
        });
        assert_eq!(
            err.to_status_and_code(),
            (StatusCode::BAD_REQUEST, "QUANTITY_EXCEEDS_REQUEST")
        );
        let details = err.details().unwrap();
        assert_eq!(details["requested"], "2");
        assert_eq!(details["attempted"], "5");
        assert_eq!(err.to_user_message(), "Cannot donate 5 rice(s). Only 2 requested.");
    }

    #[test]
    fn test_storage_error_mapping() {
        let not_found = ApiError::from(StorageError::NotFound("Donation"));
        assert_eq!(not_found.to_status_and_code().0, StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_user_message(), "Donation not found");

        let conflict = ApiError::from(StorageError::Conflict("busy".to_string()));
        assert_eq!(conflict.to_status_and_code().0, StatusCode::CONFLICT);
        assert_eq!(conflict.to_user_message(), "busy");

        let transition = ApiError::from(StorageError::InvalidTransition {
            from: "delivered".to_string(),
            to: "matched".to_string(),
        });
        assert_eq!(
            transition.to_status_and_code(),
            (StatusCode::CONFLICT, "INVALID_TRANSITION")
        );
    }

    #[test]
    fn test_internal_errors_are_sanitized() {
        let err = ApiError::from(StorageError::Sqlx(sqlx::Error::PoolTimedOut));
        assert_eq!(err.to_status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_user_message(), "An internal server error occurred");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_donation_errors_unwrap_to_their_source() {
        let err = ApiError::from(DonationError::Match(MatchError::EmptyDonation));
        assert!(matches!(err, ApiError::Match(MatchError::EmptyDonation)));
    }
}
