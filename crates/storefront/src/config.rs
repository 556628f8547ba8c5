//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local backend.
//!
//! - `TIDEMARK_API_BASE_URL` - REST API base URL
//!   (default: `http://localhost:8000/api/v1`)
//! - `TIDEMARK_PRODUCTS_PATH` - product listing path (default: `/products`)
//! - `TIDEMARK_ADDRESSES_PATH` - customer addresses path
//!   (default: `/addresses`)
//! - `TIDEMARK_LOGIN_PATH` - customer login path
//!   (default: `/auth/customer/login`)
//! - `TIDEMARK_PROFILE_PATH` - customer profile path
//!   (default: `/auth/customer/profile`)
//! - `TIDEMARK_CHECKOUT_PATH` - checkout submission path
//!   (default: `/checkout`)
//! - `TIDEMARK_PAYMENTS_PATH` - payment initiation path
//!   (default: `/payments/initiate`)
//! - `TIDEMARK_ORDERS_PATH` - orders path (default: `/orders`)
//! - `TIDEMARK_HTTP_TIMEOUT_SECS` - request timeout (default: `15`)
//! - `TIDEMARK_FALLBACK_MODE` - `demo` or `strict` (default: `demo`)
//! - `TIDEMARK_SESSION_FILE` - bearer token file
//!   (default: `.shop_auth_token`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSION_FILE: &str = ".shop_auth_token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How read-path services behave when the backend is unreachable.
///
/// `Demo` absorbs failures on read paths and replaces them with
/// deterministic local data after a short simulated delay, so a session is
/// always drivable without a backend. `Strict` propagates
/// every failure. Demo mode can mask real backend faults as success; it is
/// a demo affordance, not a resilience pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    #[default]
    Demo,
    Strict,
}

impl FallbackMode {
    /// Whether local fallback data may substitute for a failed request.
    #[must_use]
    pub const fn is_demo(self) -> bool {
        matches!(self, Self::Demo)
    }
}

impl std::str::FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected 'demo' or 'strict', got '{other}'")),
        }
    }
}

/// REST API endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: Url,
    /// Product listing path.
    pub products_path: String,
    /// Customer addresses path.
    pub addresses_path: String,
    /// Customer login path.
    pub login_path: String,
    /// Customer profile path.
    pub profile_path: String,
    /// Checkout submission path.
    pub checkout_path: String,
    /// Payment initiation path.
    pub payments_path: String,
    /// Orders path (`POST` to it, `GET` with `/{id}` appended).
    pub orders_path: String,
    /// Fixed request timeout applied to every call.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            products_path: "/products".to_owned(),
            addresses_path: "/addresses".to_owned(),
            login_path: "/auth/customer/login".to_owned(),
            profile_path: "/auth/customer/profile".to_owned(),
            checkout_path: "/checkout".to_owned(),
            payments_path: "/payments/initiate".to_owned(),
            orders_path: "/orders".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API endpoints.
    pub api: ApiConfig,
    /// Read-path behavior when the backend fails.
    pub fallback: FallbackMode,
    /// File the bearer token is persisted to.
    pub session_file: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            fallback: FallbackMode::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable
    /// (base URL, timeout, fallback mode).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("TIDEMARK_API_BASE_URL", DEFAULT_BASE_URL);
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TIDEMARK_API_BASE_URL".to_owned(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default(
            "TIDEMARK_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("TIDEMARK_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
        })?;

        let fallback = get_env_or_default("TIDEMARK_FALLBACK_MODE", "demo")
            .parse::<FallbackMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIDEMARK_FALLBACK_MODE".to_owned(), e))?;

        let api = ApiConfig {
            base_url,
            products_path: get_env_or_default("TIDEMARK_PRODUCTS_PATH", "/products"),
            addresses_path: get_env_or_default("TIDEMARK_ADDRESSES_PATH", "/addresses"),
            login_path: get_env_or_default("TIDEMARK_LOGIN_PATH", "/auth/customer/login"),
            profile_path: get_env_or_default("TIDEMARK_PROFILE_PATH", "/auth/customer/profile"),
            checkout_path: get_env_or_default("TIDEMARK_CHECKOUT_PATH", "/checkout"),
            payments_path: get_env_or_default("TIDEMARK_PAYMENTS_PATH", "/payments/initiate"),
            orders_path: get_env_or_default("TIDEMARK_ORDERS_PATH", "/orders"),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            api,
            fallback,
            session_file: PathBuf::from(get_env_or_default(
                "TIDEMARK_SESSION_FILE",
                DEFAULT_SESSION_FILE,
            )),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/api/v1");
        assert_eq!(config.api.products_path, "/products");
        assert_eq!(config.api.timeout, Duration::from_secs(15));
        assert_eq!(config.fallback, FallbackMode::Demo);
        assert_eq!(config.session_file, PathBuf::from(".shop_auth_token"));
    }

    #[test]
    fn test_fallback_mode_parsing() {
        assert_eq!("demo".parse::<FallbackMode>().unwrap(), FallbackMode::Demo);
        assert_eq!(
            "STRICT".parse::<FallbackMode>().unwrap(),
            FallbackMode::Strict
        );
        assert!("never".parse::<FallbackMode>().is_err());
    }

    #[test]
    fn test_fallback_mode_is_demo() {
        assert!(FallbackMode::Demo.is_demo());
        assert!(!FallbackMode::Strict.is_demo());
    }
}
