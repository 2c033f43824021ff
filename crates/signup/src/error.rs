//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>` unless they own their error body (the proxy
//! routes do, to preserve the legacy error envelope).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::affiliate::AffiliateError;
use crate::flow::FlowError;

/// Application-level error type for the signup service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Affiliate API operation failed.
    #[error("Affiliate error: {0}")]
    Affiliate(#[from] AffiliateError),

    /// Registration flow error.
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry; user mistakes are not
        // error events.
        if matches!(
            self,
            Self::Internal(_)
                | Self::Affiliate(_)
                | Self::Flow(FlowError::Transport(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Affiliate(_) => StatusCode::BAD_GATEWAY,
            Self::Flow(err) => match err {
                FlowError::Validation(_) => StatusCode::BAD_REQUEST,
                FlowError::Upstream(_) => StatusCode::UNPROCESSABLE_ENTITY,
                FlowError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Affiliate(_) | Self::Flow(FlowError::Transport(_)) => {
                "External service error".to_string()
            }
            Self::Flow(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Flow(FlowError::Validation("x".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Flow(FlowError::Upstream("x".to_string()))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
