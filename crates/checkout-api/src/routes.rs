//! # API Routes
//!
//! Route definitions for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Storefront and checkout widget run on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let orders = Router::new()
        .route("/create", post(handlers::create_order))
        .route("/verify", post(handlers::verify_order))
        .route("/my", get(handlers::my_orders))
        .route("/{id}", get(handlers::get_order))
        .route("/{id}/status", patch(handlers::update_order_status));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/orders", orders)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
