//! # Webhook Notifier
//!
//! Forwards order notifications to an external endpoint (a mailer service,
//! a Slack bridge, a serverless function) as JSON. Delivery failures are
//! reported as errors to the caller, which logs and swallows them; they
//! never affect order state.

use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, Notifier, Order};
use reqwest::Client;
use tracing::info;

pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }

    async fn post_event(&self, event: &str, order: &Order) -> CheckoutResult<()> {
        let payload = serde_json::json!({
            "event": event,
            "orderId": order.id,
            "customer": order.address.name,
            "phone": order.address.phone,
            "email": order.contact_email(),
            "items": order.items.len(),
            "subtotal": order.subtotal.as_decimal(),
            "deliveryCharge": order.delivery_charge.as_decimal(),
            "total": order.total.as_decimal(),
            "status": order.status.as_str(),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Notification delivered: event={}, status={}", event, status);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CheckoutError::Network(format!(
                "webhook returned {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_order_confirmation(&self, order: &Order) -> CheckoutResult<()> {
        self.post_event("order.confirmation", order).await
    }

    async fn send_admin_alert(&self, order: &Order) -> CheckoutResult<()> {
        self.post_event("order.admin_alert", order).await
    }
}
