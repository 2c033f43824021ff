//! Affiliate API client.
//!
//! Talks to the third-party affiliate backend that actually owns
//! accounts: username-availability probes, OTP dispatch, and final
//! registration. Every request body is encrypted into the affiliate's
//! AES-256-CBC hex format (see [`crate::cipher`]) before it leaves this
//! module.
//!
//! The upstream rejects requests without a recognized `Origin`/`Referer`
//! pair, so the client injects the configured values on OTP and
//! registration calls - the same role the browser-facing proxy routes
//! play for direct clients.

pub mod types;

use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use spinline_core::{OtpCode, PhoneNumber, Username};
use thiserror::Error;
use tracing::instrument;

use crate::cipher::{CipherError, PayloadCipher};
use crate::config::{AffiliateConfig, CipherKeysConfig};

pub use types::{
    OtpDispatchPayload, ParamsBody, RegisterInfoBody, RegistrationPayload, UpstreamEnvelope,
    UsernameAvailability, UsernameCheckPayload, UsernameCheckResponse,
};

/// Errors that can occur when talking to the affiliate API.
#[derive(Debug, Error)]
pub enum AffiliateError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status with no parseable envelope.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse an upstream response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Payload encryption failed.
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Client configuration is unusable (bad URL, bad header value).
    #[error("Invalid affiliate configuration: {0}")]
    Config(String),
}

/// Which upstream endpoint a proxied request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyTarget {
    SendOtp,
    Register,
}

/// Everything needed to build the final registration payload.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: Username,
    pub phone_number: PhoneNumber,
    pub password: String,
    pub otp_code: OtpCode,
}

/// Affiliate API client.
///
/// Cheap to clone (reqwest clients share their connection pool).
#[derive(Clone)]
pub struct AffiliateClient {
    client: reqwest::Client,
    send_otp_url: url::Url,
    register_url: url::Url,
    username_check_url: url::Url,
    upstream_headers: HeaderMap,
    registration_cipher: PayloadCipher,
    username_cipher: PayloadCipher,
    brand_id: String,
    brand_id_numeric: u32,
    phone_country: String,
}

impl AffiliateClient {
    /// Create a new affiliate API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URLs cannot be joined into
    /// endpoints, the header values are malformed, the brand id is not
    /// numeric, or the HTTP client fails to build.
    pub fn new(
        config: &AffiliateConfig,
        keys: &CipherKeysConfig,
    ) -> Result<Self, AffiliateError> {
        let send_otp_url = config
            .base_url
            .join("user/send-otp")
            .map_err(|e| AffiliateError::Config(e.to_string()))?;
        let register_url = config
            .base_url
            .join("user/user-register")
            .map_err(|e| AffiliateError::Config(e.to_string()))?;

        let mut upstream_headers = HeaderMap::new();
        upstream_headers.insert(
            ORIGIN,
            HeaderValue::from_str(&config.origin)
                .map_err(|e| AffiliateError::Config(format!("invalid origin: {e}")))?,
        );
        upstream_headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|e| AffiliateError::Config(format!("invalid referer: {e}")))?,
        );

        let brand_id_numeric = config
            .brand_id
            .parse::<u32>()
            .map_err(|e| AffiliateError::Config(format!("brand id is not numeric: {e}")))?;

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            send_otp_url,
            register_url,
            username_check_url: config.username_check_url.clone(),
            upstream_headers,
            registration_cipher: PayloadCipher::new(keys.registration_key()),
            username_cipher: PayloadCipher::new(keys.username_check_key()),
            brand_id: config.brand_id.clone(),
            brand_id_numeric,
            phone_country: config.phone_country.clone(),
        })
    }

    /// Probe whether a username is already registered upstream.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an unusable response body,
    /// or a non-success status. Callers treat any error as "availability
    /// unknown", never as "available".
    #[instrument(skip(self), fields(username = %username))]
    pub async fn check_username(
        &self,
        username: &Username,
    ) -> Result<UsernameAvailability, AffiliateError> {
        let payload = UsernameCheckPayload {
            username: username.as_str().to_owned(),
            brand_id: self.brand_id.clone(),
            timestamp: Utc::now().timestamp().to_string(),
        };
        let body = ParamsBody {
            params: self.username_cipher.encrypt_json(&payload)?,
        };

        let response = self
            .client
            .post(self.username_check_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AffiliateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UsernameCheckResponse = response
            .json()
            .await
            .map_err(|e| AffiliateError::Parse(e.to_string()))?;

        let taken = parsed.message.is_some_and(|m| m.is_username_exists);
        Ok(if taken {
            UsernameAvailability::Taken
        } else {
            UsernameAvailability::Available
        })
    }

    /// Request an OTP for the given phone number.
    ///
    /// The returned envelope's `success` field is authoritative; upstream
    /// reports validation failures (e.g., already-registered numbers) as
    /// `success: false` with a human-readable message.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unparseable response.
    #[instrument(skip(self), fields(phone = %phone_number))]
    pub async fn send_otp(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<UpstreamEnvelope, AffiliateError> {
        let payload = OtpDispatchPayload {
            phone_number: phone_number.as_str().to_owned(),
            phone_country: self.phone_country.clone(),
            brand_id: self.brand_id_numeric,
        };
        let body = RegisterInfoBody {
            register_info: self.registration_cipher.encrypt_json(&payload)?,
        };

        self.post_envelope(self.send_otp_url.clone(), &body).await
    }

    /// Submit the final registration payload.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unparseable response.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<UpstreamEnvelope, AffiliateError> {
        let payload = RegistrationPayload {
            user_name: request.username.as_str().to_owned(),
            phone_number: request.phone_number.as_str().to_owned(),
            password: request.password.clone(),
            otp_code: request.otp_code.as_str().to_owned(),
            phone_country: self.phone_country.clone(),
            marketing_source: String::new(),
            brand_id: self.brand_id_numeric,
            clickid: String::new(),
            fsource: String::new(),
            voluum_click_id: String::new(),
        };
        let body = RegisterInfoBody {
            register_info: self.registration_cipher.encrypt_json(&payload)?,
        };

        self.post_envelope(self.register_url.clone(), &body).await
    }

    /// Forward an already-encrypted request body verbatim.
    ///
    /// Used by the same-origin proxy routes: the upstream status and body
    /// are returned untouched so the caller can pass them through.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure; upstream error statuses
    /// are part of the verbatim passthrough.
    #[instrument(skip(self, body), fields(target = ?target))]
    pub async fn forward(
        &self,
        target: ProxyTarget,
        body: &RegisterInfoBody,
    ) -> Result<(StatusCode, bytes::Bytes), AffiliateError> {
        let url = match target {
            ProxyTarget::SendOtp => self.send_otp_url.clone(),
            ProxyTarget::Register => self.register_url.clone(),
        };

        let response = self
            .client
            .post(url)
            .headers(self.upstream_headers.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        Ok((status, bytes))
    }

    /// POST an encrypted body and decode the success/failure envelope.
    async fn post_envelope(
        &self,
        url: url::Url,
        body: &RegisterInfoBody,
    ) -> Result<UpstreamEnvelope, AffiliateError> {
        let response = self
            .client
            .post(url)
            .headers(self.upstream_headers.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // The body envelope is authoritative even on non-2xx statuses;
        // only fall back to a status error when the body is not an
        // envelope at all.
        match serde_json::from_slice::<UpstreamEnvelope>(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(AffiliateError::Parse(e.to_string())),
            Err(_) => Err(AffiliateError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}

impl std::fmt::Debug for AffiliateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffiliateClient")
            .field("send_otp_url", &self.send_otp_url.as_str())
            .field("register_url", &self.register_url.as_str())
            .field("username_check_url", &self.username_check_url.as_str())
            .field("brand_id", &self.brand_id)
            .field("phone_country", &self.phone_country)
            .finish_non_exhaustive()
    }
}
