//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::decoders::DecodeError;

/// Why the gate rejected a request.
///
/// The distinction exists for logging only. Every variant renders as the
/// same 401 response so callers cannot probe which verification step
/// failed.
#[derive(Debug)]
pub enum AuthError {
    /// No token in the `Authorization` header or `token` query parameter
    MissingToken,
    /// Token present but unusable (bad prefix, bad structure, expired)
    MalformedToken,
    /// Token signature does not match the verification secret
    SignatureInvalid,
    /// Verified claims carried a payload the decoders rejected
    ClaimDecode(DecodeError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No bearer token supplied"),
            AuthError::MalformedToken => write!(f, "Malformed or expired token"),
            AuthError::SignatureInvalid => write!(f, "Token signature mismatch"),
            AuthError::ClaimDecode(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::ClaimDecode(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// The one response shape every authentication failure maps to.
pub(super) fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized",
        }),
    )
        .into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        unauthorized_response()
    }
}
