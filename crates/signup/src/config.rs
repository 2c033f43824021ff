//! Signup service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AFFILIATE_BASE_URL` - Affiliate API base URL (e.g., <https://affiliate.example.com>)
//! - `USERNAME_CHECK_URL` - Full URL of the username-availability endpoint
//! - `AFFILIATE_ORIGIN` - `Origin` header value the upstream expects
//! - `AFFILIATE_REFERER` - `Referer` header value the upstream expects
//! - `SIGNUP_REGISTRATION_KEY` - 32-byte AES key for OTP/registration payloads
//! - `SIGNUP_USERNAME_KEY` - 32-byte AES key for username-check payloads
//! - `SIGNUP_LOGIN_REDIRECT_URL` - External login URL users are sent to after registering
//!
//! ## Optional
//! - `SIGNUP_HOST` - Bind address (default: 127.0.0.1)
//! - `SIGNUP_PORT` - Listen port (default: 3000)
//! - `SIGNUP_BRAND_ID` - Affiliate brand identifier (default: 31)
//! - `SIGNUP_PHONE_COUNTRY` - Phone country code sent upstream (default: in)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! The two AES keys are upstream-issued static key material. They are
//! injected here rather than inlined in code so that rotation does not
//! require a rebuild and so the literals never land in the repository.

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Exact byte length of the upstream AES-256 keys.
const KEY_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxxxxxxx",
    "todo",
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

/// Signup service configuration.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Affiliate API configuration
    pub affiliate: AffiliateConfig,
    /// AES key material for the affiliate wire format
    pub keys: CipherKeysConfig,
    /// External login URL users are redirected to after a successful registration
    pub login_redirect_url: Url,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Affiliate backend configuration.
#[derive(Debug, Clone)]
pub struct AffiliateConfig {
    /// Base URL of the affiliate API (send-otp and register live under it)
    pub base_url: Url,
    /// Full URL of the username-availability endpoint (separate host upstream)
    pub username_check_url: Url,
    /// `Origin` header value the upstream API requires
    pub origin: String,
    /// `Referer` header value the upstream API requires
    pub referer: String,
    /// Brand identifier baked into every payload
    pub brand_id: String,
    /// Phone country code baked into OTP/registration payloads
    pub phone_country: String,
}

/// AES key material for the two affiliate payload families.
///
/// Implements `Debug` manually to redact the key bytes.
#[derive(Clone)]
pub struct CipherKeysConfig {
    /// Key for OTP dispatch and registration payloads
    pub registration: SecretString,
    /// Key for username-availability payloads
    pub username_check: SecretString,
}

impl CipherKeysConfig {
    /// Registration key as a fixed-size array.
    ///
    /// Infallible after construction: length is validated at load time.
    #[must_use]
    pub fn registration_key(&self) -> [u8; KEY_LENGTH] {
        key_bytes(&self.registration)
    }

    /// Username-check key as a fixed-size array.
    #[must_use]
    pub fn username_check_key(&self) -> [u8; KEY_LENGTH] {
        key_bytes(&self.username_check)
    }
}

/// Copy a validated secret into a fixed-size key array.
fn key_bytes(secret: &SecretString) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    let bytes = secret.expose_secret().as_bytes();
    for (dst, src) in key.iter_mut().zip(bytes.iter()) {
        *dst = *src;
    }
    key
}

impl std::fmt::Debug for CipherKeysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKeysConfig")
            .field("registration", &"[REDACTED]")
            .field("username_check", &"[REDACTED]")
            .finish()
    }
}

impl SignupConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if key material fails validation (wrong length, placeholder value).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SIGNUP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SIGNUP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SIGNUP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SIGNUP_PORT".to_string(), e.to_string()))?;

        let affiliate = AffiliateConfig::from_env()?;
        let keys = CipherKeysConfig::from_env()?;
        let login_redirect_url = get_required_url("SIGNUP_LOGIN_REDIRECT_URL")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            affiliate,
            keys,
            login_redirect_url,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AffiliateConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_url("AFFILIATE_BASE_URL")?,
            username_check_url: get_required_url("USERNAME_CHECK_URL")?,
            origin: get_required_env("AFFILIATE_ORIGIN")?,
            referer: get_required_env("AFFILIATE_REFERER")?,
            brand_id: get_env_or_default("SIGNUP_BRAND_ID", "31"),
            phone_country: get_env_or_default("SIGNUP_PHONE_COUNTRY", "in"),
        })
    }
}

impl CipherKeysConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            registration: get_validated_key("SIGNUP_REGISTRATION_KEY")?,
            username_check: get_validated_key("SIGNUP_USERNAME_KEY")?,
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

/// Get a required environment variable parsed as a URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that key material is exactly 32 bytes and not a placeholder.
fn validate_key_material(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.len() != KEY_LENGTH {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be exactly {KEY_LENGTH} bytes (got {})", value.len()),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate AES key material from environment.
fn get_validated_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_key_material(&value, key)?;
    Ok(SecretString::from(value))
}
