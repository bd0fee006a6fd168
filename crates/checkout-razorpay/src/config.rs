//! # Razorpay Configuration
//!
//! Configuration management for the Razorpay integration.
//! All secrets are loaded from environment variables.

use checkout_core::CheckoutError;
use std::env;

/// Razorpay API configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Key id (rzp_test_... or rzp_live_...). Shareable with clients.
    pub key_id: String,

    /// Key secret. Signs payment confirmations; never leaves the server.
    pub key_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let key_id = env::var("RAZORPAY_KEY_ID").map_err(|_| {
            CheckoutError::Configuration(
                "Razorpay not configured. Add RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET.".to_string(),
            )
        })?;

        let key_secret = env::var("RAZORPAY_KEY_SECRET").map_err(|_| {
            CheckoutError::Configuration(
                "Razorpay not configured. Add RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET.".to_string(),
            )
        })?;

        if !key_id.starts_with("rzp_test_") && !key_id.starts_with("rzp_live_") {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        if key_secret.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_SECRET must not be empty".to_string(),
            ));
        }

        Ok(Self {
            key_id,
            key_secret,
            api_base_url: "https://api.razorpay.com".to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base_url: "https://api.razorpay.com".to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_detection() {
        let config = RazorpayConfig::new("rzp_test_abc123", "secret");
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());

        let config = RazorpayConfig::new("rzp_live_abc123", "secret");
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("RAZORPAY_KEY_ID");
        env::remove_var("RAZORPAY_KEY_SECRET");

        let err = RazorpayConfig::from_env().unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(_)));
        assert!(err.to_string().contains("RAZORPAY_KEY_ID"));
    }

    #[test]
    fn test_base_url_override() {
        let config =
            RazorpayConfig::new("rzp_test_abc", "secret").with_api_base_url("http://localhost:9999");
        assert_eq!(config.api_base_url, "http://localhost:9999");
    }
}
