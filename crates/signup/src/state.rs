//! Application state shared across handlers.

use std::sync::Arc;

use crate::affiliate::{AffiliateClient, AffiliateError};
use crate::config::SignupConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration and the affiliate API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SignupConfig,
    affiliate: AffiliateClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the affiliate client cannot be built from the
    /// configuration (bad URLs, malformed header values, non-numeric
    /// brand id).
    pub fn new(config: SignupConfig) -> Result<Self, AffiliateError> {
        let affiliate = AffiliateClient::new(&config.affiliate, &config.keys)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, affiliate }),
        })
    }

    /// Get a reference to the signup configuration.
    #[must_use]
    pub fn config(&self) -> &SignupConfig {
        &self.inner.config
    }

    /// Get a reference to the affiliate API client.
    #[must_use]
    pub fn affiliate(&self) -> &AffiliateClient {
        &self.inner.affiliate
    }
}
