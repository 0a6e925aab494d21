//! Route definitions for the PharmTrack platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - medicine catalog
        .nest("/medicines", medicine_routes())
        // Protected routes - batch lifecycle
        .nest("/batches", batch_routes())
        // Protected routes - QR scanning
        .nest("/scan", scan_routes())
        // Protected routes - pharmacy inventory
        .nest("/inventory", inventory_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Medicine catalog routes (protected, manufacturer)
fn medicine_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_medicines).post(handlers::create_medicine),
        )
        .route("/:medicine_id", get(handlers::get_medicine))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Batch lifecycle routes (protected, manufacturer)
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_batches).post(handlers::create_batch))
        .route("/:batch_id", get(handlers::get_batch))
        .route("/:batch_id/status", put(handlers::update_batch_status))
        .route("/:batch_id/history", get(handlers::get_batch_history))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// QR scan routes (protected, pharmacist)
fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/:qr_code", get(handlers::scan_batch))
        .route("/:qr_code/confirm", post(handlers::confirm_delivery))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Pharmacy inventory routes (protected, pharmacist)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(handlers::get_stock))
        .route("/batches", get(handlers::list_received_batches))
        .route("/watch", get(handlers::watch_inventory))
        .route_layer(middleware::from_fn(auth_middleware))
}
