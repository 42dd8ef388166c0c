// ABOUTME: HTTP request handlers for donation requests
// ABOUTME: Receivers create and delete requests; anyone can browse open and per-receiver lists

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::info;

use givelink_auth::Role;
use givelink_core::RequestCreateInput;
use givelink_matching::normalize_requested_items;
use givelink_storage::StorageError;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;

/// Create a request for the signed-in receiver.
///
/// The body holds an optional `description` plus one object per category mapping
/// item names to `{ "count": n }`.
pub async fn create_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let user = user.require(Role::Receiver)?;
    info!("Creating request for receiver: {}", user.id);

    let input = RequestCreateInput {
        description: body
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        items: normalize_requested_items(&body)?,
    };

    let request = state.request_storage.create_request(&user.id, input).await?;
    Ok(created(request))
}

/// Requests that still need items
pub async fn list_active_requests(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Listing active requests");
    let requests = state.request_storage.list_active_requests().await?;
    Ok(ok(requests))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting request: {}", id);
    let request = state.request_storage.get_request(&id).await?;
    Ok(ok(request))
}

pub async fn list_by_requestor(
    State(state): State<AppState>,
    Path(requestor_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Listing requests for receiver: {}", requestor_id);
    let requests = state
        .request_storage
        .list_by_requestor(&requestor_id)
        .await?;
    Ok(ok(requests))
}

/// Delete one of the signed-in receiver's own requests.
///
/// Requests owned by someone else are reported as missing.
pub async fn delete_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = user.require(Role::Receiver)?;
    info!("Deleting request {} for receiver {}", id, user.id);

    let request = state.request_storage.get_request(&id).await?;
    if request.requestor_id != user.id {
        return Err(StorageError::NotFound("Request").into());
    }

    state.request_storage.delete_request(&id).await?;
    Ok(ok(serde_json::json!({ "id": id, "deleted": true })))
}
