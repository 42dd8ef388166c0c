// ABOUTME: HTTP request handlers for the admin console
// ABOUTME: Read-only reports plus status overrides, all gated on the admin token

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use givelink_core::{DonationStatus, RequestStatus};

use crate::auth::AdminAccess;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Deserialize)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
}

#[derive(Deserialize)]
pub struct UpdateDonationStatus {
    pub status: DonationStatus,
}

pub async fn dashboard(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin dashboard");
    Ok(ok(state.admin_storage.dashboard().await?))
}

pub async fn history(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin history");
    Ok(ok(state.admin_storage.history().await?))
}

pub async fn matched(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin matched donations");
    Ok(ok(state.admin_storage.matched().await?))
}

pub async fn requests(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<RequestsQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin requests overview: {:?}", query);
    Ok(ok(state.admin_storage.requests_overview(query.status).await?))
}

pub async fn update_donation_status(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDonationStatus>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin setting donation {} to {}", id, body.status.as_str());
    let donation = state
        .donation_storage
        .update_status(&id, body.status)
        .await?;
    Ok(ok(donation))
}

pub async fn update_request_status(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRequestStatus>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin setting request {} to {}", id, body.status.as_str());
    let request = state.request_storage.update_status(&id, body.status).await?;
    Ok(ok(request))
}
