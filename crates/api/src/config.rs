//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Which store implementations the server wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-memory stores; state is lost on restart.
    #[default]
    Memory,
    /// S3 + DynamoDB.
    Aws,
}

impl StoreBackend {
    fn from_env_value(value: &str) -> Self {
        match value {
            "aws" => StoreBackend::Aws,
            _ => StoreBackend::Memory,
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `STORE_BACKEND` — `"memory"` or `"aws"` (default: `"memory"`)
/// - `PRODUCTS_TABLE_NAME` — record store table (default: `"products"`)
/// - `PRODUCT_IMAGES_BUCKET_NAME` — object store bucket (default: `"product-images"`)
/// - `AWS_REGION` — store region (optional)
/// - `AWS_ENDPOINT_URL` — custom store endpoint for local testing (optional)
/// - `REQUEST_TIMEOUT_SECS` — per-request timeout (default: `30`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub store_backend: StoreBackend,
    pub products_table: String,
    pub images_bucket: String,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            store_backend: std::env::var("STORE_BACKEND")
                .map(|v| StoreBackend::from_env_value(&v))
                .unwrap_or_default(),
            products_table: std::env::var("PRODUCTS_TABLE_NAME")
                .unwrap_or_else(|_| "products".to_string()),
            images_bucket: std::env::var("PRODUCT_IMAGES_BUCKET_NAME")
                .unwrap_or_else(|_| "product-images".to_string()),
            region: std::env::var("AWS_REGION").ok(),
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            store_backend: StoreBackend::Memory,
            products_table: "products".to_string(),
            images_bucket: "product-images".to_string(),
            region: None,
            endpoint_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}
