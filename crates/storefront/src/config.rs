//! Storefront configuration loaded from environment variables.
//!
//! Configuration is read exactly once at startup into an explicit struct;
//! business logic never reaches into ambient process state.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_BACKEND` - Backend selector: `shopify` or `fourthwall`
//! - `REVALIDATION_SECRET` - Shared secret for the revalidation webhook
//!
//! ## Required with `COMMERCE_BACKEND=shopify`
//! - `SHOPIFY_STORE` - Store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Required with `COMMERCE_BACKEND=fourthwall`
//! - `FOURTHWALL_API_URL` - API origin (e.g., <https://api.fourthwall.com>)
//! - `FOURTHWALL_CHECKOUT_DOMAIN` - Hosted checkout origin
//! - `FOURTHWALL_SHOP_ID` - Shop identifier sent in the `X-ShopId` header
//! - `FOURTHWALL_SECRET` - Shared secret passed as a query parameter
//! - `FOURTHWALL_STOREFRONT_COLLECTION` - Collection backing product lookup
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Selected commerce backend and its credentials
    pub backend: BackendConfig,
    /// Shared secret for the revalidation webhook
    pub revalidation_secret: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Commerce backend selection, tagged by `COMMERCE_BACKEND`.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Shopify Storefront GraphQL API.
    Shopify(ShopifyConfig),
    /// Fourthwall public REST API.
    Fourthwall(FourthwallConfig),
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .finish()
    }
}

/// Fourthwall public API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct FourthwallConfig {
    /// API origin, no trailing slash (e.g., <https://api.fourthwall.com>)
    pub api_url: String,
    /// Hosted checkout origin used to build redirect targets
    pub checkout_domain: String,
    /// Shop identifier sent in the `X-ShopId` header
    pub shop_id: String,
    /// Shared secret passed as the `secret` query parameter
    pub secret: SecretString,
    /// Collection whose products back the product-by-slug lookup
    pub storefront_collection: String,
}

impl std::fmt::Debug for FourthwallConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FourthwallConfig")
            .field("api_url", &self.api_url)
            .field("checkout_domain", &self.checkout_domain)
            .field("shop_id", &self.shop_id)
            .field("secret", &"[REDACTED]")
            .field("storefront_collection", &self.storefront_collection)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let backend = BackendConfig::from_env()?;
        let revalidation_secret = get_validated_secret("REVALIDATION_SECRET")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            revalidation_secret,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let selector = get_required_env("COMMERCE_BACKEND")?;
        match parse_backend_selector(&selector) {
            Some(BackendKind::Shopify) => Ok(Self::Shopify(ShopifyConfig::from_env()?)),
            Some(BackendKind::Fourthwall) => Ok(Self::Fourthwall(FourthwallConfig::from_env()?)),
            None => Err(ConfigError::InvalidEnvVar(
                "COMMERCE_BACKEND".to_string(),
                format!("expected 'shopify' or 'fourthwall', got '{selector}'"),
            )),
        }
    }
}

/// Backend selector values accepted in `COMMERCE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Shopify,
    Fourthwall,
}

fn parse_backend_selector(value: &str) -> Option<BackendKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "shopify" => Some(BackendKind::Shopify),
        "fourthwall" => Some(BackendKind::Fourthwall),
        _ => None,
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
        })
    }
}

impl FourthwallConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: trim_trailing_slash(get_required_env("FOURTHWALL_API_URL")?),
            checkout_domain: trim_trailing_slash(get_required_env("FOURTHWALL_CHECKOUT_DOMAIN")?),
            shop_id: get_required_env("FOURTHWALL_SHOP_ID")?,
            secret: get_validated_secret("FOURTHWALL_SECRET")?,
            storefront_collection: get_required_env("FOURTHWALL_STOREFRONT_COLLECTION")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn trim_trailing_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_selector() {
        assert_eq!(parse_backend_selector("shopify"), Some(BackendKind::Shopify));
        assert_eq!(
            parse_backend_selector("Fourthwall"),
            Some(BackendKind::Fourthwall)
        );
        assert_eq!(parse_backend_selector(" shopify "), Some(BackendKind::Shopify));
        assert_eq!(parse_backend_selector("bigcommerce"), None);
        assert_eq!(parse_backend_selector(""), None);
    }

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(
            trim_trailing_slash("https://api.example.com/".to_string()),
            "https://api.example.com"
        );
        assert_eq!(
            trim_trailing_slash("https://api.example.com".to_string()),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let config = ShopifyConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("shpat_9f8e7d6c5b4a"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_9f8e7d6c5b4a"));
    }

    #[test]
    fn test_fourthwall_config_debug_redacts_secrets() {
        let config = FourthwallConfig {
            api_url: "https://api.staging.fourthwall.com".to_string(),
            checkout_domain: "https://checkout.fourthwall.com".to_string(),
            shop_id: "sh_123".to_string(),
            secret: SecretString::from("fw_s3cr3t_t0k3n"),
            storefront_collection: "featured".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("sh_123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("fw_s3cr3t_t0k3n"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig::Shopify(ShopifyConfig {
                store: "test.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                storefront_private_token: SecretString::from("token"),
            }),
            revalidation_secret: SecretString::from("x".repeat(32)),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
