//! Affiliate proxy route handlers.
//!
//! Each handler forwards an already-encrypted request body to the
//! upstream affiliate API and passes the upstream status and JSON body
//! back verbatim. Nothing is decrypted, rewritten, or retried here; the
//! only local behavior is the fixed error envelope returned when the
//! upstream cannot be reached at all.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use crate::affiliate::{ProxyTarget, RegisterInfoBody};
use crate::state::AppState;

/// Forward an encrypted OTP dispatch request upstream.
#[instrument(skip(state, body))]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<RegisterInfoBody>,
) -> Response {
    forward(state, ProxyTarget::SendOtp, body).await
}

/// Forward an encrypted registration request upstream.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInfoBody>,
) -> Response {
    forward(state, ProxyTarget::Register, body).await
}

/// Shared passthrough: upstream status and body are returned unchanged.
async fn forward(state: AppState, target: ProxyTarget, body: RegisterInfoBody) -> Response {
    match state.affiliate().forward(target, &body).await {
        Ok((upstream_status, bytes)) => {
            let status = StatusCode::from_u16(upstream_status.as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, ?target, "affiliate proxy request failed");
            sentry::capture_error(&e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Network Proxy Error" })),
            )
                .into_response()
        }
    }
}
