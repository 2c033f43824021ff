//! Wire types for the affiliate API.
//!
//! Field names and ordering follow the upstream API exactly; the structs
//! are serialized to compact JSON and encrypted before transmission, so
//! the serialized form is part of the wire contract.

use serde::{Deserialize, Serialize};

/// Plaintext payload for a username-availability probe.
///
/// Encrypted with the username-check key and sent as `{"params": hex}`.
#[derive(Debug, Serialize)]
pub struct UsernameCheckPayload {
    pub username: String,
    pub brand_id: String,
    /// Current Unix time in seconds, as a string (upstream quirk).
    pub timestamp: String,
}

/// Plaintext payload for an OTP dispatch request.
///
/// Encrypted with the registration key and sent as `{"registerInfo": hex}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpDispatchPayload {
    pub phone_number: String,
    pub phone_country: String,
    pub brand_id: u32,
}

/// Plaintext payload for the final registration request.
///
/// The marketing-attribution fields (`marketingSource`, `clickid`,
/// `fsource`, `voluum_click_id`) are always empty: the upstream schema
/// requires them but this funnel does not generate attribution data.
#[derive(Debug, Serialize)]
pub struct RegistrationPayload {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub password: String,
    #[serde(rename = "otpCode")]
    pub otp_code: String,
    #[serde(rename = "phoneCountry")]
    pub phone_country: String,
    #[serde(rename = "marketingSource")]
    pub marketing_source: String,
    #[serde(rename = "brandId")]
    pub brand_id: u32,
    pub clickid: String,
    pub fsource: String,
    pub voluum_click_id: String,
}

/// Encrypted request body for OTP dispatch and registration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInfoBody {
    /// Hex ciphertext of the plaintext payload.
    pub register_info: String,
}

/// Encrypted request body for username-availability probes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParamsBody {
    /// Hex ciphertext of the plaintext payload.
    pub params: String,
}

/// Success/failure envelope returned by OTP dispatch and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Response from the username-availability endpoint.
#[derive(Debug, Deserialize)]
pub struct UsernameCheckResponse {
    #[serde(default)]
    pub message: Option<UsernameCheckMessage>,
}

/// Nested message object carrying the availability flag.
#[derive(Debug, Deserialize)]
pub struct UsernameCheckMessage {
    #[serde(default)]
    pub is_username_exists: bool,
}

/// Outcome of a username-availability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameAvailability {
    Available,
    Taken,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_username_check_payload_wire_shape() {
        let payload = UsernameCheckPayload {
            username: "winner".to_string(),
            brand_id: "31".to_string(),
            timestamp: "1700000000".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"username":"winner","brand_id":"31","timestamp":"1700000000"}"#
        );
    }

    #[test]
    fn test_otp_dispatch_payload_wire_shape() {
        let payload = OtpDispatchPayload {
            phone_number: "9876543210".to_string(),
            phone_country: "in".to_string(),
            brand_id: 31,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"phoneNumber":"9876543210","phoneCountry":"in","brandId":31}"#
        );
    }

    #[test]
    fn test_registration_payload_wire_shape() {
        let payload = RegistrationPayload {
            user_name: "winner".to_string(),
            phone_number: "9876543210".to_string(),
            password: "hunter22".to_string(),
            otp_code: "482913".to_string(),
            phone_country: "in".to_string(),
            marketing_source: String::new(),
            brand_id: 31,
            clickid: String::new(),
            fsource: String::new(),
            voluum_click_id: String::new(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"userName":"winner","phoneNumber":"9876543210","password":"hunter22","otpCode":"482913","phoneCountry":"in","marketingSource":"","brandId":31,"clickid":"","fsource":"","voluum_click_id":""}"#
        );
    }

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let envelope: UpstreamEnvelope = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_none());
        assert!(envelope.token.is_none());
    }

    #[test]
    fn test_username_check_response_parses() {
        let response: UsernameCheckResponse =
            serde_json::from_str(r#"{"message":{"is_username_exists":true}}"#).unwrap();
        assert!(response.message.unwrap().is_username_exists);

        // Absent message defaults to "does not exist".
        let response: UsernameCheckResponse = serde_json::from_str("{}").unwrap();
        assert!(response.message.is_none());
    }
}
