//! Batch lifecycle HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::batch::{BatchService, CreateBatchInput, UpdateStatusInput};
use crate::AppState;
use shared::models::UserRole;

/// List the calling manufacturer's batches
pub async fn list_batches(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.get_batches(current_user.0.user_id).await {
        Ok(batches) => (
            StatusCode::OK,
            Json(serde_json::json!({ "batches": batches })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new batch with a generated QR code
pub async fn create_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateBatchInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.create_batch(current_user.0.user_id, input).await {
        Ok(batch) => (StatusCode::CREATED, Json(batch)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one batch owned by the calling manufacturer
pub async fn get_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.get_batch(current_user.0.user_id, batch_id).await {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply a manufacturer status transition (forward-only)
pub async fn update_batch_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service
        .update_status(current_user.0.user_id, batch_id, input)
        .await
    {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get the audit trail of a batch visible to the caller
pub async fn get_batch_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.get_history(current_user.0.user_id, batch_id).await {
        Ok(history) => (
            StatusCode::OK,
            Json(serde_json::json!({ "history": history })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
