//! HTTP middleware for the signup service.

pub mod request_id;

pub use request_id::request_id_middleware;
