//! Error types and response handling for page rendering.
//!
//! Provides error classification, HTTP status code mapping, and JSON error
//! response generation.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::version::FingerprintError;

/// Errors that can occur while negotiating or rendering a page.
#[derive(Debug, Error)]
pub enum InertiaError {
    /// Invalid adapter configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset directory could not be fingerprinted
    #[error("Asset fingerprint failed: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// A protocol header carried a value that can't be interpreted
    #[error("Malformed {header} header: {value:?}")]
    MalformedHeader { header: &'static str, value: String },

    /// Upstream middleware stored ambient props that aren't a mapping
    #[error("Ambient props must be a mapping, found {found}")]
    AmbientProps { found: &'static str },

    /// Handler props didn't serialize to a mapping
    #[error("Page props must be a mapping, found {found}")]
    PropsNotMapping { found: &'static str },

    /// The version guard middleware wasn't installed for this route
    #[error("Inertia context missing; is the version guard layered on this route?")]
    MissingContext,

    /// Page or props could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTML shell could not be produced
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    /// HTTP error from response building
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<axum::http::Error> for InertiaError {
    fn from(err: axum::http::Error) -> Self {
        InertiaError::Http(err.to_string())
    }
}

impl InertiaError {
    /// Map error variant to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            InertiaError::MalformedHeader { .. } => StatusCode::BAD_REQUEST,
            InertiaError::Config(_)
            | InertiaError::Fingerprint(_)
            | InertiaError::AmbientProps { .. }
            | InertiaError::PropsNotMapping { .. }
            | InertiaError::MissingContext
            | InertiaError::Serialization(_)
            | InertiaError::Render(_)
            | InertiaError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string for JSON responses
    pub fn error_type(&self) -> &'static str {
        match self {
            InertiaError::Config(_) => "config_error",
            InertiaError::Fingerprint(_) => "fingerprint_error",
            InertiaError::MalformedHeader { .. } => "malformed_header",
            InertiaError::AmbientProps { .. } => "ambient_props",
            InertiaError::PropsNotMapping { .. } => "props_not_mapping",
            InertiaError::MissingContext => "missing_context",
            InertiaError::Serialization(_) => "serialization_error",
            InertiaError::Render(_) => "render_error",
            InertiaError::Http(_) => "http_error",
        }
    }
}

impl IntoResponse for InertiaError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, kind = self.error_type(), "Inertia request failed");
        } else {
            tracing::debug!(error = %self, kind = self.error_type(), "Rejected Inertia request");
        }
        ErrorResponse::from_error(&self)
    }
}

/// Builder for standardized error responses
pub struct ErrorResponse;

impl ErrorResponse {
    /// Create a JSON error response from an InertiaError
    pub fn from_error(err: &InertiaError) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": err.error_type(),
                "message": err.to_string(),
            }
        });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = err.status_code();
        response.headers_mut().insert(
            CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/json"),
        );
        response
    }
}
