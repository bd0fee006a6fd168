//! # Order Notifications
//!
//! Best-effort confirmations after an order is paid. Notifier failures are
//! logged and swallowed by callers; order state is the source of truth,
//! not email delivery.

use crate::error::CheckoutResult;
use crate::order::Order;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Outbound notification interface
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Confirmation to the customer
    async fn send_order_confirmation(&self, order: &Order) -> CheckoutResult<()>;

    /// New-order alert to the shop admin
    async fn send_admin_alert(&self, order: &Order) -> CheckoutResult<()>;
}

/// Type alias for a shared notifier
pub type BoxedNotifier = Arc<dyn Notifier>;

/// Default notifier that just logs. Useful when SMTP/webhook delivery is
/// not configured.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_order_confirmation(&self, order: &Order) -> CheckoutResult<()> {
        info!(
            order_id = %order.id,
            to = order.contact_email().unwrap_or("<none>"),
            total = %order.total.display(),
            "order confirmation"
        );
        Ok(())
    }

    async fn send_admin_alert(&self, order: &Order) -> CheckoutResult<()> {
        info!(
            order_id = %order.id,
            customer = %order.address.name,
            total = %order.total.display(),
            items = order.items.len(),
            "new order alert"
        );
        Ok(())
    }
}
