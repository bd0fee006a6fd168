//! # Application State
//!
//! Shared state for the Axum application: the catalog, the order ledger,
//! the payment gateway and the notifier, all behind their trait seams.

use crate::notify_webhook::WebhookNotifier;
use checkout_core::{
    BoxedGateway, BoxedNotifier, CatalogStore, LoggingNotifier, MemoryLedger, OrderLedger,
    TomlCatalog,
};
use checkout_razorpay::RazorpayGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Optional URL that receives order notifications as JSON
    pub order_webhook_url: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            order_webhook_url: std::env::var("ORDER_WEBHOOK_URL").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Authoritative product prices
    pub catalog: Arc<dyn CatalogStore>,
    /// Persisted orders
    pub ledger: Arc<dyn OrderLedger>,
    /// Payment provider
    pub gateway: BoxedGateway,
    /// Post-payment notifications
    pub notifier: BoxedNotifier,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: TOML catalog, in-process ledger,
    /// Razorpay gateway from env.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let catalog = load_catalog()?;

        // Missing Razorpay credentials fail here with a clear message
        // rather than degrading into a gateway that silently no-ops.
        let gateway = RazorpayGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;

        let notifier: BoxedNotifier = match &config.order_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())?),
            None => Arc::new(LoggingNotifier),
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            ledger: Arc::new(MemoryLedger::new()),
            gateway: Arc::new(gateway),
            notifier,
            config,
        })
    }
}

/// Load the product catalog from config file
fn load_catalog() -> anyhow::Result<TomlCatalog> {
    if let Ok(path) = std::env::var("PRODUCTS_FILE") {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        let catalog = TomlCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
        tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
        return Ok(catalog);
    }

    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = TomlCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    // Every checkout falls back to client-claimed prices without a catalog
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(TomlCatalog::new())
}
