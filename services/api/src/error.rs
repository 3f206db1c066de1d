//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each
//! variant is rendered to HTTP clients.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use relay_core::RelayError;
use serde::Serialize;
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Configuration could not be loaded at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Required request input is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The uploaded file ran past the size ceiling while streaming.
    #[error("File exceeds the upload limit of {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: u64 },

    /// No upstream credential is configured for the completion service.
    #[error("{0}")]
    MissingCredential(String),

    /// The completion service failed or could not be reached.
    #[error("Upstream completion request failed")]
    Upstream { detail: String },

    /// Represents a standard Input/Output error (socket binding, upload writes).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable summary.
    pub error: String,
    /// Machine-stable error kind.
    pub kind: &'static str,
    /// Diagnostic detail such as the raw upstream body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MissingCredential(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::PayloadTooLarge { .. } => "payload_too_large",
            ApiError::MissingCredential(_) => "configuration_error",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => "internal_error",
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, detail) = match self {
            ApiError::Upstream { detail } => (self.to_string(), Some(detail.clone())),
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                ("Internal server error".to_string(), Some(self.to_string()))
            }
            _ => (self.to_string(), None),
        };
        ErrorBody { error, kind: self.kind(), detail }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Validation(msg) => ApiError::Validation(msg),
            RelayError::Configuration(msg) => ApiError::MissingCredential(msg),
            RelayError::Upstream { detail } => ApiError::Upstream { detail },
            RelayError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                tracing::error!("Internal service error: {}", self);
            }
            ApiError::Upstream { detail } => {
                tracing::warn!(detail = %detail, "Upstream completion error");
            }
            ApiError::MissingCredential(_) => {
                tracing::warn!("Configuration error: {}", self);
            }
            ApiError::Validation(_) | ApiError::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_errors_map_to_stable_kinds() {
        let cases = [
            (RelayError::Validation("x".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (RelayError::Configuration("x".into()), StatusCode::BAD_REQUEST, "configuration_error"),
            (RelayError::Upstream { detail: "x".into() }, StatusCode::BAD_GATEWAY, "upstream_error"),
            (RelayError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        ];
        for (relay_err, status, kind) in cases {
            let err = ApiError::from(relay_err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn upstream_detail_is_surfaced_verbatim() {
        let body = ApiError::Upstream { detail: "raw body".into() }.body();
        assert_eq!(body.detail.as_deref(), Some("raw body"));
        assert_eq!(body.kind, "upstream_error");
    }

    #[test]
    fn validation_errors_have_no_detail() {
        let body = ApiError::Validation("No file uploaded".into()).body();
        assert_eq!(body.error, "No file uploaded");
        assert!(body.detail.is_none());
    }
}
