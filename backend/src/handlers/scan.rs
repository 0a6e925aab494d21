//! QR scan HTTP handlers for pharmacists

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::middleware::CurrentUser;
use crate::services::batch::{BatchService, ScanOutcome};
use crate::AppState;
use shared::models::UserRole;

/// Look up a batch by its QR code before confirming
pub async fn scan_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(qr_code): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Pharmacist) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.find_by_qr_code(&qr_code).await {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Confirm delivery of the batch with the given QR code
///
/// Idempotent from the caller's perspective: a second confirmation reports
/// `already_received` instead of applying the transition again.
pub async fn confirm_delivery(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(qr_code): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Pharmacist) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service
        .confirm_delivery(current_user.0.user_id, &qr_code)
        .await
    {
        Ok(ScanOutcome::Confirmed(batch)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "already_received": false,
                "message": "Delivery confirmed successfully",
                "batch": batch,
            })),
        )
            .into_response(),
        Ok(ScanOutcome::AlreadyReceived(batch)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "already_received": true,
                "message": "Batch already received",
                "batch": batch,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
