//! Relay error taxonomy.
//!
//! Only client-input problems get deliberate local responses. Upstream
//! failures surface as a generic 502; upstream-returned error statuses are
//! not errors at all and pass through verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors detected by the relay itself.
#[derive(Debug, Error)]
pub enum RelayError {
    /// GET/HEAD/POST arrived without a usable `url` query parameter.
    #[error("missing `url` query parameter")]
    MissingTargetUrl,

    /// Method outside GET/HEAD/POST/OPTIONS.
    #[error("method not allowed")]
    UnsupportedMethod,

    /// The target URL did not parse. The fetch attempt is the only URL
    /// validation this relay performs, so this surfaces like any other
    /// unfulfillable outbound request.
    #[error("invalid target url: {0}")]
    InvalidTargetUrl(#[from] url::ParseError),

    /// The outbound request failed before any upstream response existed
    /// (DNS failure, connection refused, transport timeout).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::MissingTargetUrl => StatusCode::BAD_REQUEST.into_response(),
            RelayError::UnsupportedMethod => StatusCode::METHOD_NOT_ALLOWED.into_response(),
            RelayError::InvalidTargetUrl(_) | RelayError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}
