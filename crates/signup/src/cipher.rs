//! Payload cipher for the affiliate wire format.
//!
//! The affiliate backend expects request payloads encrypted with
//! AES-256-CBC, PKCS7 padding, and a fixed all-zero IV, transmitted as
//! lowercase hex of the ciphertext alone (the IV is never sent; the
//! backend hardcodes the same zero IV). Two distinct static keys are in
//! use upstream: one for username-availability checks and one for
//! OTP/registration payloads. Both are injected via configuration, never
//! inlined here.
//!
//! A fixed zero IV under a static key has no semantic security: identical
//! plaintexts always produce identical ciphertexts. That is an inherited
//! property of the upstream protocol, reproduced exactly for
//! interoperability. Do not "fix" the IV without upstream confirmation,
//! and do not reuse this module for anything that needs real
//! confidentiality.

use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use serde::Serialize;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// The fixed IV mandated by the upstream wire format.
const ZERO_IV: [u8; 16] = [0u8; 16];

/// Errors that can occur when encrypting a payload.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Payload could not be serialized to JSON.
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encrypts JSON payloads into the affiliate's hex-ciphertext format.
///
/// Cheap to clone; one instance exists per key (registration and
/// username-check) and lives in the application state.
#[derive(Clone)]
pub struct PayloadCipher {
    key: [u8; 32],
}

impl PayloadCipher {
    /// Create a cipher from 32 bytes of key material.
    #[must_use]
    pub const fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Serialize `payload` to compact JSON and encrypt it.
    ///
    /// Returns the ciphertext as lowercase hex with no IV prefix. The
    /// output is deterministic for a given payload and key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Serialize`] if the payload cannot be
    /// serialized to JSON.
    pub fn encrypt_json<T: Serialize>(&self, payload: &T) -> Result<String, CipherError> {
        let plaintext = serde_json::to_vec(payload)?;
        Ok(self.encrypt_bytes(&plaintext))
    }

    /// Encrypt raw bytes into the hex wire format.
    fn encrypt_bytes(&self, plaintext: &[u8]) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &ZERO_IV.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        hex::encode(ciphertext)
    }
}

impl std::fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
