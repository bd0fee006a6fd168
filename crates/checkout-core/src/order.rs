//! # Order Ledger
//!
//! Persisted order records and their status state machine.
//!
//! Lifecycle: orders are created `pending` before any money moves, then
//! transitioned to `paid` exactly once by payment verification. Admin
//! fulfilment moves paid orders through processing/shipped/delivered.
//! Items, address and amounts are snapshotted at creation and never
//! rewritten; no operation deletes an order.

use crate::cart::{Address, ValidatedLineItem};
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Price;
use crate::pricing::OrderDraft;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Order status state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment
    Pending,
    /// Payment verified
    Paid,
    /// Being prepared for dispatch
    Processing,
    /// Handed to the courier
    Shipped,
    /// Delivered to the customer
    Delivered,
    /// Cancelled before fulfilment
    Cancelled,
    /// Payment never completed
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        }
    }

    /// Parse a status from the admin dashboard. Only the fulfilment set is
    /// accepted; `paid` and `failed` are owned by payment verification and
    /// can never be set by hand.
    pub fn parse_admin(value: &str) -> CheckoutResult<Self> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CheckoutError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted order row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier
    pub id: String,

    /// Owning user; None for guest checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Contact email for guest orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,

    /// Line items, snapshotted at creation. Immutable thereafter.
    pub items: Vec<ValidatedLineItem>,

    /// Delivery address, snapshotted at creation. Immutable thereafter.
    pub address: Address,

    pub subtotal: Price,
    pub delivery_charge: Price,
    pub total: Price,

    pub status: OrderStatus,

    /// Identifier the payment provider assigned to this checkout attempt
    pub gateway_order_id: String,

    /// Identifier of the completed payment; set by verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_payment_id: Option<String>,

    /// Signature supplied with the payment confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_signature: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new pending order from a validated draft
    pub fn from_draft(
        draft: OrderDraft,
        user_id: Option<String>,
        guest_email: Option<String>,
        gateway_order_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            guest_email,
            items: draft.items,
            address: draft.address,
            subtotal: draft.subtotal,
            delivery_charge: draft.delivery_charge,
            total: draft.total,
            status: OrderStatus::Pending,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            gateway_signature: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Email to notify for this order, if any
    pub fn contact_email(&self) -> Option<&str> {
        self.address
            .email
            .as_deref()
            .or(self.guest_email.as_deref())
    }
}

/// Result of a `mark_paid` call
#[derive(Debug, Clone)]
pub struct PaidOutcome {
    pub order: Order,
    /// True only on the pending -> paid transition. Replays of the same
    /// payment id succeed with `false` so side effects fire exactly once.
    pub first_transition: bool,
}

/// Persistence seam for order rows. The ledger exclusively owns persisted
/// orders; callers hold only transient copies.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Insert a new pending order with its immutable snapshot
    async fn create(
        &self,
        draft: OrderDraft,
        user_id: Option<String>,
        guest_email: Option<String>,
        gateway_order_id: String,
    ) -> CheckoutResult<Order>;

    /// Transition an order to paid, attaching the payment reference and
    /// signature. Idempotent for replays carrying the same payment id.
    async fn mark_paid(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> CheckoutResult<PaidOutcome>;

    /// Admin-triggered fulfilment status update
    async fn update_status(&self, order_id: &str, status: &str) -> CheckoutResult<Order>;

    /// Fetch a single order
    async fn get(&self, order_id: &str) -> CheckoutResult<Order>;

    /// All orders for a user, newest first
    async fn list_by_user(&self, user_id: &str) -> CheckoutResult<Vec<Order>>;
}

/// In-process ledger over a `RwLock`ed map. Production deployments put a
/// relational store behind the same trait.
#[derive(Default)]
pub struct MemoryLedger {
    orders: RwLock<HashMap<String, Order>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderLedger for MemoryLedger {
    async fn create(
        &self,
        draft: OrderDraft,
        user_id: Option<String>,
        guest_email: Option<String>,
        gateway_order_id: String,
    ) -> CheckoutResult<Order> {
        let order = Order::from_draft(draft, user_id, guest_email, gateway_order_id);
        self.orders
            .write()
            .await
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn mark_paid(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> CheckoutResult<PaidOutcome> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CheckoutError::NotFound {
                order_id: order_id.to_string(),
            })?;

        match order.status {
            OrderStatus::Pending => {
                order.status = OrderStatus::Paid;
                order.gateway_payment_id = Some(payment_id.to_string());
                order.gateway_signature = Some(signature.to_string());
                order.updated_at = Utc::now();
                Ok(PaidOutcome {
                    order: order.clone(),
                    first_transition: true,
                })
            }
            // Replay of the same confirmation (client retry after a dropped
            // response) succeeds without touching the row again.
            OrderStatus::Paid if order.gateway_payment_id.as_deref() == Some(payment_id) => {
                Ok(PaidOutcome {
                    order: order.clone(),
                    first_transition: false,
                })
            }
            other => Err(CheckoutError::InvalidStatus(format!(
                "cannot mark order {} paid from status {}",
                order_id, other
            ))),
        }
    }

    async fn update_status(&self, order_id: &str, status: &str) -> CheckoutResult<Order> {
        let status = OrderStatus::parse_admin(status)?;
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CheckoutError::NotFound {
                order_id: order_id.to_string(),
            })?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn get(&self, order_id: &str) -> CheckoutResult<Order> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| CheckoutError::NotFound {
                order_id: order_id.to_string(),
            })
    }

    async fn list_by_user(&self, user_id: &str) -> CheckoutResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut mine: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }
}
