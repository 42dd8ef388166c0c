// ABOUTME: HTTP request handlers for donations
// ABOUTME: Donation submission through reconciliation, listings and donor-driven status progress

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use givelink_auth::Role;
use givelink_core::{DonationFilter, DonationStatus};
use givelink_matching::{normalize_images, normalize_items, DonationInput};
use givelink_storage::StorageError;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiError, ApiResult};
use crate::state::AppState;

/// Request body for submitting a donation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub request_id: String,
    pub description: Option<String>,
    /// Category → item → count, as an object or a JSON-encoded string
    #[serde(default)]
    pub donation_data: Value,
    /// Category → list of image URLs
    #[serde(default)]
    pub images: Value,
}

#[derive(Deserialize)]
pub struct UpdateDonationStatusRequest {
    pub status: DonationStatus,
}

/// Submit a donation against a request as the signed-in donor
pub async fn create_donation(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateDonationRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.require(Role::Donor)?;
    info!(
        "Donor {} submitting donation for request {}",
        user.id, body.request_id
    );

    let request_id = body.request_id.trim();
    if request_id.is_empty() {
        return Err(ApiError::Validation("requestId is required".to_string()));
    }

    let input = DonationInput {
        donor_id: user.id,
        description: body
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        items: normalize_items(&body.donation_data)?,
        images: normalize_images(&body.images),
    };

    let donation = state.donation_service.submit(request_id, &input).await?;
    Ok(created(donation))
}

/// List donations, optionally filtered by `status`, `donorId` or `requestId`
pub async fn list_donations(
    State(state): State<AppState>,
    Query(filter): Query<DonationFilter>,
) -> ApiResult<impl IntoResponse> {
    info!("Listing donations with filter: {:?}", filter);
    let donations = state.donation_storage.list_donations(&filter).await?;
    Ok(ok(donations))
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting donation: {}", id);
    let donation = state.donation_storage.get_donation(&id).await?;
    Ok(ok(donation))
}

pub async fn list_by_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Listing donations for donor: {}", donor_id);
    let donations = state.donation_storage.list_by_donor(&donor_id).await?;
    Ok(ok(donations))
}

/// Move one of the signed-in donor's own donations forward
pub async fn update_donation_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateDonationStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.require(Role::Donor)?;
    info!(
        "Donor {} setting donation {} to {}",
        user.id,
        id,
        body.status.as_str()
    );

    let donation = state.donation_storage.get_donation(&id).await?;
    if donation.donor_id != user.id {
        return Err(StorageError::NotFound("Donation").into());
    }

    let donation = state
        .donation_storage
        .update_status(&id, body.status)
        .await?;
    Ok(ok(donation))
}
