//! # Razorpay Orders API
//!
//! Creates payment intents against `POST /v1/orders` and verifies the
//! client-submitted payment confirmation signature.
//!
//! Razorpay's widget flow: the server registers an order for the amount in
//! paise, the browser widget collects payment against it, then the client
//! posts back `{order_id, payment_id, signature}` where the signature is
//! `hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`.

use crate::config::RazorpayConfig;
use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, GatewayIntent, IntentNotes, PaymentGateway, Price};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Razorpay implementation of [`PaymentGateway`]
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new gateway
    pub fn new(config: RazorpayConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = RazorpayConfig::from_env()?;
        Self::new(config)
    }

    /// The signing payload for a payment confirmation
    fn signing_payload(order_id: &str, payment_id: &str) -> String {
        format!("{}|{}", order_id, payment_id)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, notes), fields(receipt = %receipt))]
    async fn create_intent(
        &self,
        amount: Price,
        receipt: &str,
        notes: &IntentNotes,
    ) -> CheckoutResult<GatewayIntent> {
        let request = RazorpayOrderRequest {
            amount: amount.amount,
            currency: amount.currency.as_str(),
            receipt,
            notes: RazorpayNotes {
                customer: &notes.customer,
                phone: &notes.phone,
            },
        };

        debug!(
            "Creating Razorpay order: amount={} {}, receipt={}",
            request.amount, request.currency, receipt
        );

        let url = format!("{}/v1/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<RazorpayErrorResponse>(&body) {
                let RazorpayError { code, description } = error_response.error;
                return Err(CheckoutError::Provider {
                    provider: "razorpay".to_string(),
                    message: match code {
                        Some(code) => format!("{}: {}", code, description),
                        None => description,
                    },
                });
            }

            return Err(CheckoutError::Provider {
                provider: "razorpay".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let order: RazorpayOrderResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })?;

        info!(
            "Created Razorpay order: id={}, status={}",
            order.id,
            order.status.as_deref().unwrap_or("created")
        );

        Ok(GatewayIntent {
            gateway_order_id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let payload = Self::signing_payload(order_id, payment_id);
        let expected = compute_hmac_sha256(&self.config.key_secret, &payload);
        constant_time_compare(&expected, signature)
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct RazorpayOrderRequest<'a> {
    /// Amount in the smallest currency unit (paise)
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: RazorpayNotes<'a>,
}

#[derive(Debug, Serialize)]
struct RazorpayNotes<'a> {
    customer: &'a str,
    phone: &'a str,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    #[serde(default)]
    code: Option<String>,
    description: String,
}

// =============================================================================
// Signature Verification
// =============================================================================

pub(crate) fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::Currency;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_with_base(base: &str) -> RazorpayGateway {
        let config = RazorpayConfig::new("rzp_test_abc", "test_secret").with_api_base_url(base);
        RazorpayGateway::new(config).unwrap()
    }

    #[test]
    fn test_hmac_sha256_is_hex_digest() {
        let sig = compute_hmac_sha256("test_secret", "order_1|pay_1");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_verify_signature_round_trip() {
        let gateway = gateway_with_base("http://unused");
        let signature = compute_hmac_sha256("test_secret", "order_9|pay_9");

        assert!(gateway.verify_signature("order_9", "pay_9", &signature));
        // Any tampering with the refs or the signature must fail
        assert!(!gateway.verify_signature("order_9", "pay_8", &signature));
        assert!(!gateway.verify_signature("order_8", "pay_9", &signature));
        let last = signature.chars().last().unwrap();
        let mut tampered = signature[..signature.len() - 1].to_string();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(!gateway.verify_signature("order_9", "pay_9", &tampered));
    }

    #[test]
    fn test_signing_payload_format() {
        assert_eq!(
            RazorpayGateway::signing_payload("order_abc", "pay_def"),
            "order_abc|pay_def"
        );
    }

    #[tokio::test]
    async fn test_create_intent_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(body_partial_json(serde_json::json!({
                "amount": 39_900,
                "currency": "INR",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_N1mbl3",
                "amount": 39_900,
                "currency": "INR",
                "status": "created"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_with_base(&server.uri());
        let intent = gateway
            .create_intent(
                Price::from_minor(39_900, Currency::Inr),
                "aeon_1700000000000",
                &IntentNotes {
                    customer: "Priya Sharma".into(),
                    phone: "9876543210".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(intent.gateway_order_id, "order_N1mbl3");
        assert_eq!(intent.amount, 39_900);
        assert_eq!(intent.currency, "INR");
    }

    #[tokio::test]
    async fn test_create_intent_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "The amount must be at least INR 1.00"
                }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_with_base(&server.uri());
        let err = gateway
            .create_intent(
                Price::from_minor(0, Currency::Inr),
                "aeon_0",
                &IntentNotes::default(),
            )
            .await
            .unwrap_err();

        match err {
            CheckoutError::Provider { provider, message } => {
                assert_eq!(provider, "razorpay");
                assert!(message.contains("BAD_REQUEST_ERROR"));
                assert!(message.contains("at least INR 1.00"));
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_intent_network_error() {
        // Nothing listening on this port
        let gateway = gateway_with_base("http://127.0.0.1:9");
        let err = gateway
            .create_intent(
                Price::from_minor(100, Currency::Inr),
                "aeon_1",
                &IntentNotes::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Network(_)));
        assert!(err.is_retryable());
    }
}
