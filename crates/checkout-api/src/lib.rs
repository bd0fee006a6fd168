//! # checkout-api
//!
//! HTTP API server for the AEON checkout engine, built with Axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/orders/create` - Validate cart, create payment intent, persist pending order
//! - `POST /api/orders/verify` - Verify payment signature, mark order paid
//! - `GET /api/orders/my` - Orders for the signed-in user
//! - `GET /api/orders/{id}` - Fetch one order
//! - `PATCH /api/orders/{id}/status` - Admin fulfilment status update

pub mod handlers;
pub mod notify_webhook;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
