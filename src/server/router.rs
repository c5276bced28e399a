//! Route table
//!
//! Public routes: health, the item list, date availability, bill
//! submission, login and session lookup. Everything else requires an owner
//! bearer token, enforced by the `OwnerSession` extractor in each handler.

use super::handlers::{bills, bookings, dashboard, items, session};
use super::host::AppState;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(session_routes())
        .merge(item_routes())
        .merge(booking_routes())
        .merge(bill_routes())
        .merge(report_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tent-house"
    }))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(session::current_session))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/{id}/rate", put(items::update_item_rate))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/availability", get(bookings::availability))
}

fn bill_routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(bills::list_bills).post(bills::submit_bill))
        .route("/bills/quick", post(bills::create_quick_bill))
        .route("/bills/detailed", post(bills::create_detailed_bill))
        .route("/bills/{id}", get(bills::get_bill))
        .route("/bills/{id}/approve", post(bills::approve_bill))
        .route("/bills/{id}/reject", post(bills::reject_bill))
        .route("/bills/{id}/received-amount", put(bills::update_received_amount))
        .route("/bills/{id}/export", get(bills::export_bill))
        .route("/bills/{id}/share", get(bills::share_bill))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/reconciliation", get(dashboard::reconciliation))
}
