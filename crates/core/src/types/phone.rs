//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input is not exactly the expected number of digits.
    #[error("phone number must be exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Actual input length.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number contains non-digit character '{ch}'")]
    NonDigit {
        /// The offending character.
        ch: char,
    },
}

/// A national mobile number as the upstream OTP API expects it.
///
/// The affiliate backend pairs this with a fixed country code, so the
/// number itself is exactly ten digits with no prefix, spaces, or
/// punctuation.
///
/// ## Examples
///
/// ```
/// use spinline_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("9876543210").is_ok());
/// assert!(PhoneNumber::parse("98765").is_err());        // too short
/// assert!(PhoneNumber::parse("+919876543210").is_err()); // prefix
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Exact digit count required by the upstream OTP dispatch API.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly ten ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if let Some(ch) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PhoneNumberError::NonDigit { ch });
        }

        if s.len() != Self::DIGITS {
            return Err(PhoneNumberError::WrongLength {
                expected: Self::DIGITS,
                got: s.len(),
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
