//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("username contains invalid character '{ch}'")]
    InvalidChar {
        /// The offending character.
        ch: char,
    },
}

/// A candidate account username.
///
/// The upstream affiliate API only answers availability checks for
/// candidates of at least four characters, so the same minimum is enforced
/// here at parse time.
///
/// ## Constraints
///
/// - Length: 4-64 characters
/// - ASCII alphanumeric plus `.`, `_`, and `-`
///
/// ## Examples
///
/// ```
/// use spinline_core::Username;
///
/// assert!(Username::parse("player_one").is_ok());
/// assert!(Username::parse("abc").is_err());     // too short
/// assert!(Username::parse("na me").is_err());   // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length the upstream availability check will answer for.
    pub const MIN_LENGTH: usize = 4;

    /// Maximum length accepted by the upstream registration API.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 4 characters, longer
    /// than 64 characters, or contains characters outside
    /// `[A-Za-z0-9._-]`.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(ch) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(UsernameError::InvalidChar { ch });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("abcd").is_ok());
        assert!(Username::parse("player_one").is_ok());
        assert!(Username::parse("Winner-247").is_ok());
        assert!(Username::parse("a.b.c.d").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("abc"),
            Err(UsernameError::TooShort { min: 4 })
        ));
        assert!(matches!(
            Username::parse(""),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_parse_invalid_char() {
        assert!(matches!(
            Username::parse("user name"),
            Err(UsernameError::InvalidChar { ch: ' ' })
        ));
        assert!(matches!(
            Username::parse("user@host"),
            Err(UsernameError::InvalidChar { ch: '@' })
        ));
    }

    #[test]
    fn test_display() {
        let username = Username::parse("player_one").unwrap();
        assert_eq!(format!("{username}"), "player_one");
    }

    #[test]
    fn test_serde_roundtrip() {
        let username = Username::parse("player_one").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"player_one\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }

    #[test]
    fn test_from_str() {
        let username: Username = "player_one".parse().unwrap();
        assert_eq!(username.as_str(), "player_one");
    }
}
