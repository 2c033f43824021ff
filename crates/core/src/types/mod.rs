//! Core types for the Spinline signup funnel.
//!
//! This module provides type-safe wrappers for the registration domain.

pub mod otp;
pub mod phone;
pub mod username;

pub use otp::{OtpCode, OtpCodeError};
pub use phone::{PhoneNumber, PhoneNumberError};
pub use username::{Username, UsernameError};
