//! # Request Handlers
//!
//! Axum request handlers for the checkout API, including the two-phase
//! checkout orchestration: create (validate cart -> gateway intent ->
//! pending order) and verify (signature check -> paid -> notifications).

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use checkout_core::{validate_cart, Address, CartLineItem, CheckoutError, IntentNotes, Order};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    /// Cart line items. Prices here are client-claimed and never trusted.
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    /// Delivery address
    pub address: Address,
    /// Contact email for guest checkout
    #[serde(default)]
    pub email: Option<String>,
}

/// Create order response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Internal order id
    pub order_id: String,
    /// Razorpay order reference for the payment widget
    pub razorpay_order_id: String,
    /// Amount in paise
    pub amount: i64,
    /// ISO currency code
    pub currency: String,
    /// Publishable key id for the widget (never the secret)
    pub key_id: String,
    /// Prefill bundle for the payment widget
    pub prefill: Prefill,
}

#[derive(Debug, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Verify payment request, posted by the client after completing payment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyOrderRequest {
    pub order_id: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderResponse {
    pub success: bool,
    pub order_id: String,
}

/// Admin status update request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Validation and signature messages go to the client verbatim;
    // provider/ledger detail stays in the server logs.
    let message = if err.is_client_safe() {
        err.to_string()
    } else {
        error!("checkout error: {}", err);
        match err {
            CheckoutError::Configuration(_)
            | CheckoutError::Provider { .. }
            | CheckoutError::Network(_) => "Payment service unavailable. Please try again.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    };

    (status, Json(ErrorResponse::new(message)))
}

fn user_id_from(headers: &HeaderMap) -> Option<String> {
    // Session/OAuth middleware would inject the user here; the header is
    // the explicit seam in its absence.
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "aeon-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Phase 1: validate the cart, create a payment intent, persist a pending order
#[instrument(skip(state, headers, request), fields(items = request.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, HandlerError> {
    let user_id = user_id_from(&headers);

    // Recompute all amounts from catalog prices; client totals are ignored
    let draft = validate_cart(&*state.catalog, &request.items, &request.address)
        .await
        .map_err(checkout_error_to_response)?;

    let customer_name = draft.address.name.clone();
    let customer_phone = draft.address.phone.clone();
    let prefill_email = request
        .email
        .clone()
        .or_else(|| draft.address.email.clone())
        .unwrap_or_default();

    let receipt = format!("aeon_{}", chrono::Utc::now().timestamp_millis());
    let notes = IntentNotes {
        customer: customer_name.clone(),
        phone: customer_phone.clone(),
    };

    // Gateway failure here leaves no order row behind
    let intent = state
        .gateway
        .create_intent(draft.total, &receipt, &notes)
        .await
        .map_err(checkout_error_to_response)?;

    let gateway_order_id = intent.gateway_order_id.clone();
    let order = state
        .ledger
        .create(draft, user_id, request.email, gateway_order_id)
        .await
        .map_err(|e| {
            // The remote intent is now orphaned; unconfirmed intents expire
            // on the provider side, but the operator should know.
            error!(
                gateway_order_id = %intent.gateway_order_id,
                "order persistence failed after intent creation: {}", e
            );
            checkout_error_to_response(e)
        })?;

    info!(
        order_id = %order.id,
        gateway_order_id = %order.gateway_order_id,
        total = %order.total.display(),
        "created pending order"
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        razorpay_order_id: order.gateway_order_id,
        amount: intent.amount,
        currency: intent.currency,
        key_id: state.gateway.key_id().to_string(),
        prefill: Prefill {
            name: customer_name,
            email: prefill_email,
            contact: customer_phone,
        },
    }))
}

/// Phase 2: verify the payment signature and mark the order paid
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn verify_order(
    State(state): State<AppState>,
    Json(request): Json<VerifyOrderRequest>,
) -> Result<Json<VerifyOrderResponse>, HandlerError> {
    let order = state
        .ledger
        .get(&request.order_id)
        .await
        .map_err(checkout_error_to_response)?;

    // The signature binds the gateway order to the payment; the request
    // must also bind that gateway order to our order row.
    if order.gateway_order_id != request.razorpay_order_id {
        warn!(
            order_id = %request.order_id,
            expected = %order.gateway_order_id,
            got = %request.razorpay_order_id,
            "gateway order mismatch in verification request"
        );
        return Err(checkout_error_to_response(CheckoutError::SignatureMismatch));
    }

    let valid = state.gateway.verify_signature(
        &request.razorpay_order_id,
        &request.razorpay_payment_id,
        &request.razorpay_signature,
    );

    if !valid {
        // Security-relevant rejection, logged distinctly from ordinary
        // validation failures. Order state is untouched.
        warn!(
            order_id = %request.order_id,
            gateway_order_id = %request.razorpay_order_id,
            "payment signature mismatch"
        );
        return Err(checkout_error_to_response(CheckoutError::SignatureMismatch));
    }

    let outcome = state
        .ledger
        .mark_paid(
            &request.order_id,
            &request.razorpay_payment_id,
            &request.razorpay_signature,
        )
        .await
        .map_err(checkout_error_to_response)?;

    if outcome.first_transition {
        info!(
            order_id = %outcome.order.id,
            payment_id = %request.razorpay_payment_id,
            "order paid"
        );
        dispatch_notifications(&state, outcome.order.clone());
    }

    Ok(Json(VerifyOrderResponse {
        success: true,
        order_id: request.order_id,
    }))
}

/// Fire-and-forget confirmation emails. The HTTP response never waits on
/// delivery and delivery failures never surface to the caller.
fn dispatch_notifications(state: &AppState, order: Order) {
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send_order_confirmation(&order).await {
            warn!(order_id = %order.id, "order confirmation failed: {}", e);
        }
        if let Err(e) = notifier.send_admin_alert(&order).await {
            warn!(order_id = %order.id, "admin alert failed: {}", e);
        }
    });
}

/// Orders belonging to the signed-in user, newest first
pub async fn my_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, HandlerError> {
    let user_id = user_id_from(&headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Sign in to view orders")),
        )
    })?;

    let orders = state
        .ledger
        .list_by_user(&user_id)
        .await
        .map_err(checkout_error_to_response)?;

    Ok(Json(orders))
}

/// Fetch a single order by id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, HandlerError> {
    let order = state
        .ledger
        .get(&order_id)
        .await
        .map_err(checkout_error_to_response)?;
    Ok(Json(order))
}

/// Admin: move an order through the fulfilment statuses
#[instrument(skip(state, request), fields(order_id = %order_id, status = %request.status))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let order = state
        .ledger
        .update_status(&order_id, &request.status)
        .await
        .map_err(checkout_error_to_response)?;

    info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(serde_json::json!({
        "success": true,
        "status": order.status,
    })))
}
