//! HTTP route handlers for the signup service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check
//!
//! # Affiliate proxy (same-origin endpoints for the signup form)
//! POST /api/send-otp    - Forward encrypted OTP dispatch upstream
//! POST /api/register    - Forward encrypted registration upstream
//! ```
//!
//! The proxy routes exist so the browser-side form never has to make a
//! cross-origin call: the upstream affiliate API rejects requests without
//! its expected `Origin`/`Referer` pair, which the server-side client
//! injects.

pub mod proxy;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create the affiliate proxy routes router.
pub fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(proxy::send_otp))
        .route("/register", post(proxy::register))
}

/// Create all routes for the signup service.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", proxy_routes())
}
