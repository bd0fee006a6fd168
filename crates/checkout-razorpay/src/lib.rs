//! # checkout-razorpay
//!
//! Razorpay payment gateway adapter for the AEON checkout engine.
//!
//! Implements [`checkout_core::PaymentGateway`]:
//! - Payment-intent creation via the Razorpay Orders API (amounts in paise)
//! - HMAC-SHA256 verification of payment confirmations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_razorpay::RazorpayGateway;
//! use checkout_core::{IntentNotes, PaymentGateway, Price, Currency};
//!
//! // Requires RAZORPAY_KEY_ID / RAZORPAY_KEY_SECRET
//! let gateway = RazorpayGateway::from_env()?;
//!
//! let intent = gateway
//!     .create_intent(Price::new(399.0, Currency::Inr), "aeon_1700000000000", &notes)
//!     .await?;
//!
//! // Later, when the client posts back its payment confirmation:
//! let ok = gateway.verify_signature(&intent.gateway_order_id, &payment_id, &signature);
//! ```

pub mod config;
pub mod gateway;

// Re-exports
pub use config::RazorpayConfig;
pub use gateway::RazorpayGateway;
