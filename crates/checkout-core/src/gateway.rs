//! # Payment Gateway Trait
//!
//! Seam between the checkout flow and the payment provider. The provider
//! creates a remote payment intent for an amount and later the client
//! submits a confirmation whose signature must be verified server-side.

use crate::error::CheckoutResult;
use crate::money::Price;
use async_trait::async_trait;
use std::sync::Arc;

/// Address-derived metadata attached to a payment intent
#[derive(Debug, Clone, Default)]
pub struct IntentNotes {
    pub customer: String,
    pub phone: String,
}

/// A remote payment intent created with the provider
#[derive(Debug, Clone)]
pub struct GatewayIntent {
    /// Identifier the provider assigned to this checkout attempt
    pub gateway_order_id: String,
    /// Amount in minor units, as registered with the provider
    pub amount: i64,
    /// ISO currency code
    pub currency: String,
}

/// Payment provider interface
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount`. The amount is expressed in
    /// the smallest currency unit when it reaches the provider.
    async fn create_intent(
        &self,
        amount: Price,
        receipt: &str,
        notes: &IntentNotes,
    ) -> CheckoutResult<GatewayIntent>;

    /// Verify the signature of a payment confirmation. This is the sole
    /// proof that a payment actually succeeded; it must never be replaced
    /// by a client-only assertion.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Publishable key identifier, safe to hand to clients. Never the secret.
    fn key_id(&self) -> &str;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;
