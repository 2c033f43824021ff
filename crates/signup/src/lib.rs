//! Spinline Signup library.
//!
//! This crate provides the signup funnel as a library, allowing it to be
//! tested and embedded:
//!
//! - [`cipher`] - AES-256-CBC payload encryption in the affiliate wire format
//! - [`affiliate`] - HTTP client for the affiliate backend
//! - [`flow`] - The two-step registration wizard state machine
//! - [`routes`] - Same-origin proxy endpoints for browser clients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod affiliate;
pub mod cipher;
pub mod config;
pub mod error;
pub mod flow;
pub mod middleware;
pub mod routes;
pub mod state;
