//! Medicine catalog HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::medicine::{CreateMedicineInput, MedicineService};
use crate::AppState;
use shared::models::UserRole;

/// List the calling manufacturer's medicines
pub async fn list_medicines(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = MedicineService::new(state.db.clone());

    match service.get_medicines(current_user.0.user_id).await {
        Ok(medicines) => (
            StatusCode::OK,
            Json(serde_json::json!({ "medicines": medicines })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a new medicine
pub async fn create_medicine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateMedicineInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = MedicineService::new(state.db.clone());

    match service.create_medicine(current_user.0.user_id, input).await {
        Ok(medicine) => (StatusCode::CREATED, Json(medicine)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one medicine by ID
pub async fn get_medicine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(medicine_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Manufacturer) {
        return e.into_response();
    }

    let service = MedicineService::new(state.db.clone());

    match service
        .get_medicine(current_user.0.user_id, medicine_id)
        .await
    {
        Ok(medicine) => (StatusCode::OK, Json(medicine)).into_response(),
        Err(e) => e.into_response(),
    }
}
