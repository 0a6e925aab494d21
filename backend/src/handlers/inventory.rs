//! Pharmacy inventory HTTP handlers

use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::middleware::CurrentUser;
use crate::services::batch::BatchService;
use crate::services::inventory::InventoryService;
use crate::AppState;
use shared::models::UserRole;

/// Aggregated per-medicine stock for the calling pharmacist
pub async fn get_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Pharmacist) {
        return e.into_response();
    }

    let service = InventoryService::new(state.db.clone());

    match service.get_stock(current_user.0.user_id).await {
        Ok(stock) => (StatusCode::OK, Json(serde_json::json!({ "stock": stock }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Received batches for the calling pharmacist, newest first
pub async fn list_received_batches(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = current_user.0.require_role(UserRole::Pharmacist) {
        return e.into_response();
    }

    let service = BatchService::new(state.db.clone(), state.notifier.clone());

    match service.get_received_batches(current_user.0.user_id).await {
        Ok(batches) => (
            StatusCode::OK,
            Json(serde_json::json!({ "batches": batches })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// SSE stream of inventory-change hints for the calling pharmacist
///
/// Events carry no inventory data; clients refetch the stock endpoint on
/// every event, so missed events under lag only delay a refresh.
pub async fn watch_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let pharmacist_id = current_user.0.user_id;

    let stream = BroadcastStream::new(state.notifier.subscribe()).filter_map(move |result| {
        match result {
            Ok(event) if event.pharmacist_id == pharmacist_id => {
                let data = serde_json::to_string(&event).unwrap_or_default();
                Some(Ok(Event::default().event("inventory_changed").data(data)))
            }
            // Other pharmacists' events and lagged receivers are skipped
            _ => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
