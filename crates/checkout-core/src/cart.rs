//! # Cart & Address Types
//!
//! Client-submitted cart shapes and the validated forms produced by the
//! pricing engine. Client prices are never trusted; see [`crate::pricing`].

use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// A line item as submitted by the client. Untrusted.
///
/// Field names match the storefront wire format. The claimed `price` is a
/// decimal amount in major units and is only used as a fallback when the
/// product cannot be found in the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartLineItem {
    /// Product ID
    pub id: String,
    /// Display name (denormalized)
    #[serde(default)]
    pub name: String,
    /// Client-claimed unit price in major units. Never authoritative.
    #[serde(default)]
    pub price: f64,
    /// Quantity; missing or zero is coerced to 1
    #[serde(default)]
    pub qty: u32,
    /// Thumbnail reference for display
    #[serde(default)]
    pub thumb: Option<String>,
}

impl CartLineItem {
    /// Quantity coerced to an integer >= 1
    pub fn quantity(&self) -> u32 {
        self.qty.max(1)
    }
}

/// Delivery address. name, phone, line1 and pincode are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    pub name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Address {
    /// Check all mandatory fields are present and non-empty
    pub fn validate(&self) -> CheckoutResult<()> {
        let mandatory = [
            (&self.name, "name"),
            (&self.phone, "phone"),
            (&self.line1, "line1"),
            (&self.pincode, "pincode"),
        ];
        for (value, _field) in mandatory {
            if value.trim().is_empty() {
                return Err(CheckoutError::Validation("Incomplete address".to_string()));
            }
        }
        Ok(())
    }
}

/// A line item after price reconciliation against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedLineItem {
    /// Product ID
    pub product_id: String,
    /// Product name (denormalized for display and emails)
    pub name: String,
    /// Authoritative unit price
    pub unit_price: Price,
    /// Quantity, always >= 1
    pub quantity: u32,
}

impl ValidatedLineItem {
    /// Line total for this item
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn address() -> Address {
        Address {
            name: "Priya Sharma".into(),
            phone: "9876543210".into(),
            line1: "14 MG Road".into(),
            line2: None,
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            email: Some("priya@example.com".into()),
        }
    }

    #[test]
    fn test_address_validate_ok() {
        assert!(address().validate().is_ok());
    }

    #[test]
    fn test_address_missing_mandatory_field() {
        let mut addr = address();
        addr.pincode = "  ".into();
        let err = addr.validate().unwrap_err();
        assert_eq!(err.to_string(), "Incomplete address");
    }

    #[test]
    fn test_quantity_coercion() {
        let item = CartLineItem {
            id: "p1".into(),
            name: "Gold Hoops".into(),
            price: 499.0,
            qty: 0,
            thumb: None,
        };
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = r#"{"id":"p1","qty":1,"surprise":true}"#;
        assert!(serde_json::from_str::<CartLineItem>(raw).is_err());
    }

    #[test]
    fn test_validated_item_total() {
        let item = ValidatedLineItem {
            product_id: "p1".into(),
            name: "Gold Hoops".into(),
            unit_price: Price::new(500.0, Currency::Inr),
            quantity: 3,
        };
        assert_eq!(item.total().amount, 150_000);
    }
}
