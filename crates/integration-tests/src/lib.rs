//! Integration tests for the Spinline signup funnel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p spinline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `proxy_passthrough` - Verbatim forwarding through the `/api` proxy routes
//! - `signup_flow` - The full registration wizard against a mocked affiliate
//!
//! All tests run against a [`mockito`] server standing in for the
//! affiliate backend; nothing external is contacted.

use secrecy::SecretString;
use spinline_signup::config::{AffiliateConfig, CipherKeysConfig, SignupConfig};
use url::Url;

/// Key material mirroring the upstream-documented static keys.
pub const REGISTRATION_KEY: &str = "aNdRfUjXn2r5u8x/A?D(G+KbPeShVkYp";
/// Username-check key.
pub const USERNAME_KEY: &str = "Rp}ex:?zG0=&m&,DOX$X<:HI>G=LNKeL";

/// Build a service configuration pointing at a mock affiliate backend.
///
/// `base` covers `user/send-otp` and `user/user-register`;
/// `username_check` is the full URL of the availability endpoint.
#[must_use]
#[allow(clippy::missing_panics_doc)] // test helper, fixed inputs
pub fn test_config(base: &str, username_check: &str) -> SignupConfig {
    SignupConfig {
        host: "127.0.0.1".parse().expect("valid test host"),
        port: 0,
        affiliate: AffiliateConfig {
            base_url: Url::parse(base).expect("valid test base url"),
            username_check_url: Url::parse(username_check).expect("valid test check url"),
            origin: "https://brand.test".to_string(),
            referer: "https://brand.test/".to_string(),
            brand_id: "31".to_string(),
            phone_country: "in".to_string(),
        },
        keys: CipherKeysConfig {
            registration: SecretString::from(REGISTRATION_KEY),
            username_check: SecretString::from(USERNAME_KEY),
        },
        login_redirect_url: Url::parse("https://play.test/login").expect("valid test redirect"),
        sentry_dsn: None,
    }
}
