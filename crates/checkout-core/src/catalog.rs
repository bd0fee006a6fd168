//! # Catalog Store
//!
//! Read-only source of authoritative product prices. The pricing engine
//! issues a single batch lookup per checkout; anything implementing
//! [`CatalogStore`] can back it (a database in production, a TOML file here).

use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Price;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read interface consumed by the pricing engine
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Batch price lookup. Unknown ids are simply absent from the result.
    async fn prices_by_ids(&self, ids: &[String]) -> CheckoutResult<HashMap<String, Price>>;
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Authoritative price
    pub price: Price,

    /// Whether this product is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

/// File-backed catalog, loaded from `config/products.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlCatalog {
    pub products: Vec<Product>,
}

impl TomlCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products available for purchase
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[async_trait]
impl CatalogStore for TomlCatalog {
    async fn prices_by_ids(&self, ids: &[String]) -> CheckoutResult<HashMap<String, Price>> {
        if ids.is_empty() {
            return Err(CheckoutError::Validation("Cart is empty".to_string()));
        }
        Ok(self
            .active_products()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id.clone(), p.price))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn catalog() -> TomlCatalog {
        let mut catalog = TomlCatalog::new();
        catalog.add(Product {
            id: "p1".into(),
            name: "Gold Hoops".into(),
            description: String::new(),
            price: Price::new(500.0, Currency::Inr),
            active: true,
            image_url: None,
        });
        catalog.add(Product {
            id: "p2".into(),
            name: "Silver Anklet".into(),
            description: String::new(),
            price: Price::new(300.0, Currency::Inr),
            active: false,
            image_url: None,
        });
        catalog
    }

    #[tokio::test]
    async fn test_batch_lookup() {
        let prices = catalog()
            .prices_by_ids(&["p1".into(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices["p1"].amount, 50_000);
    }

    #[tokio::test]
    async fn test_inactive_products_excluded() {
        let prices = catalog().prices_by_ids(&["p2".into()]).await.unwrap();
        assert!(prices.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let raw = r#"
[[products]]
id = "aeon-ring-01"
name = "Aeon Solitaire Ring"
price = { amount = 129900, currency = "INR" }

[[products]]
id = "aeon-chain-02"
name = "Aeon Rope Chain"
price = { amount = 84900, currency = "INR" }
active = false
"#;
        let catalog = TomlCatalog::from_toml(raw).unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.active_products().count(), 1);
        assert_eq!(catalog.get("aeon-ring-01").unwrap().price.amount, 129_900);
    }
}
