//! # checkout-core
//!
//! Core types and traits for the AEON checkout engine.
//!
//! This crate provides:
//! - The pricing & validation engine (`validate_cart`)
//! - `Order`, `OrderStatus` and the `OrderLedger` persistence seam
//! - `CatalogStore` for authoritative product prices
//! - `PaymentGateway` for payment providers
//! - `Notifier` for post-payment confirmations
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{validate_cart, IntentNotes, OrderLedger};
//!
//! // Phase 1: validate the cart against catalog prices
//! let draft = validate_cart(&*catalog, &items, &address).await?;
//!
//! // Create a payment intent for the authoritative total
//! let intent = gateway.create_intent(draft.total, &receipt, &notes).await?;
//!
//! // Persist the pending order with its immutable snapshot
//! let order = ledger.create(draft, user_id, email, intent.gateway_order_id).await?;
//!
//! // Phase 2: after the client pays, verify and mark paid
//! if gateway.verify_signature(&order.gateway_order_id, &payment_id, &signature) {
//!     ledger.mark_paid(&order.id, &payment_id, &signature).await?;
//! }
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod gateway;
pub mod money;
pub mod notify;
pub mod order;
pub mod pricing;

// Re-exports for convenience
pub use cart::{Address, CartLineItem, ValidatedLineItem};
pub use catalog::{CatalogStore, Product, TomlCatalog};
pub use error::{CheckoutError, CheckoutResult};
pub use gateway::{BoxedGateway, GatewayIntent, IntentNotes, PaymentGateway};
pub use money::{Currency, Price};
pub use notify::{BoxedNotifier, LoggingNotifier, Notifier};
pub use order::{MemoryLedger, Order, OrderLedger, OrderStatus, PaidOutcome};
pub use pricing::{validate_cart, OrderDraft, DELIVERY_CHARGE, FREE_DELIVERY_THRESHOLD};
