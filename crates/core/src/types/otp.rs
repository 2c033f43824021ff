//! One-time password code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OtpCodeError {
    /// The input is empty after trimming.
    #[error("OTP code cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("OTP code must be at most {max} digits")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a non-digit character.
    #[error("OTP code contains non-digit character '{ch}'")]
    NonDigit {
        /// The offending character.
        ch: char,
    },
}

/// A one-time password code as typed by the user.
///
/// Surrounding whitespace is trimmed at parse time, since codes are
/// routinely copy-pasted from SMS with a trailing space.
///
/// ## Examples
///
/// ```
/// use spinline_core::OtpCode;
///
/// assert_eq!(OtpCode::parse(" 482913 ").unwrap().as_str(), "482913");
/// assert!(OtpCode::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Maximum code length the upstream API issues.
    pub const MAX_LENGTH: usize = 8;

    /// Parse an `OtpCode` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than eight
    /// characters, or contains non-digit characters.
    pub fn parse(s: &str) -> Result<Self, OtpCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(OtpCodeError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(OtpCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(ch) = trimmed.chars().find(|c| !c.is_ascii_digit()) {
            return Err(OtpCodeError::NonDigit { ch });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OtpCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OtpCode {
    type Err = OtpCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
