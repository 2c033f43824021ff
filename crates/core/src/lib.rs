//! Spinline Core - Shared domain types.
//!
//! This crate provides the validated domain types used across the Spinline
//! signup funnel:
//! - `signup` - Registration/OTP funnel service
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no crypto.
//! Inputs are parsed into these types at the edge; everything past the edge
//! can rely on their invariants.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for usernames, phone numbers, and OTP codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
