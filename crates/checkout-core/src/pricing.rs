//! # Pricing & Validation Engine
//!
//! Recomputes subtotal/delivery/total for a client-submitted cart,
//! reconciling every line against catalog prices in one batch read.
//! This is the only place order amounts are ever computed.

use crate::cart::{Address, CartLineItem, ValidatedLineItem};
use crate::catalog::CatalogStore;
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{Currency, Price};
use tracing::warn;

/// Free delivery at or above ₹999
pub const FREE_DELIVERY_THRESHOLD: i64 = 99_900;
/// Flat ₹99 delivery below the threshold
pub const DELIVERY_CHARGE: i64 = 9_900;

/// A validated order draft, ready for intent creation and persistence.
/// Amounts here are authoritative; nothing downstream recomputes them.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub items: Vec<ValidatedLineItem>,
    pub address: Address,
    pub subtotal: Price,
    pub delivery_charge: Price,
    pub total: Price,
}

fn cart_out_of_range() -> CheckoutError {
    CheckoutError::Validation("Cart total out of range".to_string())
}

/// Delivery charge for a given subtotal
pub fn delivery_charge_for(subtotal: Price) -> Price {
    if subtotal.amount >= FREE_DELIVERY_THRESHOLD {
        Price::zero(subtotal.currency)
    } else {
        Price::from_minor(DELIVERY_CHARGE, subtotal.currency)
    }
}

/// Validate a cart and address, producing an [`OrderDraft`] or failing
/// with [`CheckoutError::Validation`].
///
/// For every distinct product id a single batch price lookup is issued.
/// When a product is found, its catalog price wins regardless of the
/// client-claimed price. When it is not found, the claimed price is used
/// as a fallback and a warning is logged; this preserves the behavior of
/// the storefront this service replaces.
pub async fn validate_cart(
    catalog: &dyn CatalogStore,
    items: &[CartLineItem],
    address: &Address,
) -> CheckoutResult<OrderDraft> {
    if items.is_empty() {
        return Err(CheckoutError::Validation("Cart is empty".to_string()));
    }
    address.validate()?;

    let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
    let price_map = catalog.prices_by_ids(&ids).await?;

    let currency = Currency::Inr;
    let mut subtotal = Price::zero(currency);
    let mut validated = Vec::with_capacity(items.len());

    for item in items {
        let unit_price = match price_map.get(&item.id) {
            Some(price) => *price,
            None => {
                // The claimed price is untrusted input; a non-finite or
                // out-of-range value must never reach the arithmetic below.
                let fallback = Price::try_new(item.price, currency).ok_or_else(|| {
                    CheckoutError::Validation(format!("Invalid price for product {}", item.id))
                })?;
                warn!(
                    product_id = %item.id,
                    claimed = item.price,
                    "product missing from catalog, falling back to client-claimed price"
                );
                fallback
            }
        };
        let quantity = item.quantity();
        let line_total = unit_price
            .checked_times(quantity)
            .ok_or_else(cart_out_of_range)?;
        subtotal = subtotal.checked_add(line_total).ok_or_else(cart_out_of_range)?;
        validated.push(ValidatedLineItem {
            product_id: item.id.clone(),
            name: item.name.clone(),
            unit_price,
            quantity,
        });
    }

    let delivery_charge = delivery_charge_for(subtotal);
    let total = subtotal
        .checked_add(delivery_charge)
        .ok_or_else(cart_out_of_range)?;

    Ok(OrderDraft {
        items: validated,
        address: address.clone(),
        subtotal,
        delivery_charge,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, TomlCatalog};

    fn catalog() -> TomlCatalog {
        let mut catalog = TomlCatalog::new();
        for (id, name, price) in [
            ("p1", "Gold Hoops", 500.0),
            ("p2", "Silver Anklet", 300.0),
        ] {
            catalog.add(Product {
                id: id.into(),
                name: name.into(),
                description: String::new(),
                price: Price::new(price, Currency::Inr),
                active: true,
                image_url: None,
            });
        }
        catalog
    }

    fn address() -> Address {
        Address {
            name: "Priya Sharma".into(),
            phone: "9876543210".into(),
            line1: "14 MG Road".into(),
            line2: None,
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            email: None,
        }
    }

    fn line(id: &str, qty: u32, claimed: f64) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            name: id.into(),
            price: claimed,
            qty,
            thumb: None,
        }
    }

    #[tokio::test]
    async fn test_free_delivery_above_threshold() {
        // p1 at ₹500 x 2 => subtotal ₹1000, free delivery
        let draft = validate_cart(&catalog(), &[line("p1", 2, 1.0)], &address())
            .await
            .unwrap();
        assert_eq!(draft.subtotal.amount, 100_000);
        assert_eq!(draft.delivery_charge.amount, 0);
        assert_eq!(draft.total.amount, 100_000);
    }

    #[tokio::test]
    async fn test_flat_delivery_below_threshold() {
        // p2 at ₹300 x 1 => subtotal ₹300, ₹99 delivery, total ₹399
        let draft = validate_cart(&catalog(), &[line("p2", 1, 300.0)], &address())
            .await
            .unwrap();
        assert_eq!(draft.subtotal.amount, 30_000);
        assert_eq!(draft.delivery_charge.amount, 9_900);
        assert_eq!(draft.total.amount, 39_900);
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        assert_eq!(
            delivery_charge_for(Price::from_minor(99_900, Currency::Inr)).amount,
            0
        );
        assert_eq!(
            delivery_charge_for(Price::from_minor(99_899, Currency::Inr)).amount,
            DELIVERY_CHARGE
        );
    }

    #[tokio::test]
    async fn test_claimed_price_ignored_for_known_products() {
        // Client claims ₹1 but the catalog says ₹500
        let draft = validate_cart(&catalog(), &[line("p1", 1, 1.0)], &address())
            .await
            .unwrap();
        assert_eq!(draft.items[0].unit_price.amount, 50_000);
        assert_eq!(draft.subtotal.amount, 50_000);
    }

    #[tokio::test]
    async fn test_claimed_price_fallback_for_unknown_products() {
        let draft = validate_cart(&catalog(), &[line("ghost", 2, 250.0)], &address())
            .await
            .unwrap();
        assert_eq!(draft.items[0].unit_price.amount, 25_000);
        assert_eq!(draft.subtotal.amount, 50_000);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let err = validate_cart(&catalog(), &[], &address()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[tokio::test]
    async fn test_incomplete_address_rejected() {
        let mut addr = address();
        addr.phone = String::new();
        let err = validate_cart(&catalog(), &[line("p1", 1, 500.0)], &addr)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Incomplete address");
    }

    #[tokio::test]
    async fn test_absurd_claimed_price_rejected() {
        // Unknown product, so the claimed price is the fallback path
        let err = validate_cart(&catalog(), &[line("ghost", 3, 1e300)], &address())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid price for product ghost");

        for bad in [f64::INFINITY, f64::NAN, -10.0] {
            let err = validate_cart(&catalog(), &[line("ghost", 1, bad)], &address())
                .await
                .unwrap_err();
            assert!(matches!(err, CheckoutError::Validation(_)), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_cart_total_overflow_rejected() {
        // The price passes the per-amount bound but price x qty cannot fit
        let err = validate_cart(
            &catalog(),
            &[line("ghost", u32::MAX, 1_000_000_000_000.0)],
            &address(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Cart total out of range");
    }

    #[tokio::test]
    async fn test_zero_quantity_coerced_to_one() {
        let draft = validate_cart(&catalog(), &[line("p2", 0, 300.0)], &address())
            .await
            .unwrap();
        assert_eq!(draft.items[0].quantity, 1);
        assert_eq!(draft.subtotal.amount, 30_000);
    }
}
