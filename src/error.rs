//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant maps
//! to a specific HTTP status code and the JSON error body used by every
//! endpoint. Server-side failures are logged in full here and reduced to a
//! generic label on the wire so provider internals never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error body returned by every failing endpoint.
///
/// ```json
/// { "error": "Keywords are required" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short human-readable error description.
    pub error: String,
    /// Optional additional detail, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Server-side error enum covering the full failure taxonomy.
///
/// | Variant | HTTP status |
/// |---|---|
/// | `InvalidArgument`, `UnsupportedMarketplace` | 400 Bad Request |
/// | `Unauthorized` | 401 Unauthorized |
/// | `Forbidden`, `QuotaExceeded` | 403 Forbidden |
/// | `NotFound` | 404 Not Found |
/// | `Upstream`, `Persistence`, `Internal` | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed required input. Detected before any external call.
    #[error("{0}")]
    InvalidArgument(String),

    /// Entity absent, or access denied-by-omission (non-owners are never told
    /// whether the entity exists).
    #[error("{0}")]
    NotFound(String),

    /// The request named a marketplace with no registered client.
    #[error("Unsupported marketplace: {0}")]
    UnsupportedMarketplace(String),

    /// A plan-based limit was hit.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Marketplace provider reported a failure. The provider's message is
    /// carried for logging but never serialized to the client.
    #[error("marketplace provider error: {0}")]
    Upstream(String),

    /// No usable credentials were presented.
    #[error("{0}")]
    Unauthorized(String),

    /// Credentials were presented but rejected.
    #[error("{0}")]
    Forbidden(String),

    /// Storage layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) | Self::UnsupportedMarketplace(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the client-facing error label.
    ///
    /// Client errors (4xx) carry their own message verbatim since the text is
    /// ours. Server errors (5xx) are reduced to a fixed label.
    #[must_use]
    pub fn client_label(&self) -> String {
        match self {
            Self::Upstream(_) => "Marketplace provider request failed".to_string(),
            Self::Persistence(_) => "Storage operation failed".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.client_label(),
            message: None,
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::InvalidArgument("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnsupportedMarketplace("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::QuotaExceeded("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_detail_is_not_exposed() {
        let err = ApiError::Upstream("provider said: secret internals".into());
        let label = err.client_label();
        assert_eq!(label, "Marketplace provider request failed");
        assert!(!label.contains("secret"));
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::InvalidArgument("Keywords are required".into());
        assert_eq!(err.client_label(), "Keywords are required");
    }

    #[test]
    fn error_body_omits_absent_message() {
        let body = ErrorResponse {
            error: "Search not found".to_string(),
            message: None,
        };
        let json = serde_json::to_string(&body).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, r#"{"error":"Search not found"}"#);
    }
}
