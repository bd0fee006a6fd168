//! # Checkout Error Types
//!
//! Typed error handling for the checkout engine.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad or incomplete cart/address data, client-correctable
    #[error("{0}")]
    Validation(String),

    /// Order not found in the ledger
    #[error("Order not found: {order_id}")]
    NotFound { order_id: String },

    /// Illegal order status value or transition
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Payment signature did not match the expected HMAC
    #[error("Payment verification failed. Invalid signature.")]
    SignatureMismatch,

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Order ledger persistence error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_) | CheckoutError::Provider { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Validation(_) => 400,
            CheckoutError::NotFound { .. } => 404,
            CheckoutError::InvalidStatus(_) => 400,
            CheckoutError::SignatureMismatch => 400,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::Network(_) => 502,
            CheckoutError::Ledger(_) => 500,
            CheckoutError::Serialization(_) => 500,
        }
    }

    /// Returns true when the error message is safe to surface to clients.
    ///
    /// Provider and ledger failures may carry credentials or internals in
    /// their messages; those are logged server-side and replaced with a
    /// generic message at the HTTP boundary.
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_)
                | CheckoutError::NotFound { .. }
                | CheckoutError::InvalidStatus(_)
                | CheckoutError::SignatureMismatch
        )
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("timeout".into()).is_retryable());
        assert!(CheckoutError::Provider {
            provider: "razorpay".into(),
            message: "503".into()
        }
        .is_retryable());
        assert!(!CheckoutError::Validation("Cart is empty".into()).is_retryable());
        assert!(!CheckoutError::SignatureMismatch.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::Validation("bad".into()).status_code(), 400);
        assert_eq!(
            CheckoutError::NotFound {
                order_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(CheckoutError::SignatureMismatch.status_code(), 400);
        assert_eq!(
            CheckoutError::Provider {
                provider: "razorpay".into(),
                message: "down".into()
            }
            .status_code(),
            502
        );
        assert_eq!(CheckoutError::Configuration("no key".into()).status_code(), 500);
    }

    #[test]
    fn test_client_safe() {
        assert!(CheckoutError::Validation("Cart is empty".into()).is_client_safe());
        assert!(CheckoutError::SignatureMismatch.is_client_safe());
        assert!(!CheckoutError::Provider {
            provider: "razorpay".into(),
            message: "key_secret rejected".into()
        }
        .is_client_safe());
        assert!(!CheckoutError::Ledger("row lock".into()).is_client_safe());
    }
}
