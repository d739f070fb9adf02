//! Axum wiring for the gate.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use super::context::SecurityContext;
use super::decoders::{LoginModelDecoder, RoleDecoder};
use super::errors::AuthError;
use super::gate::{AuthDecision, AuthGate};

/// Run every request through the gate before it reaches `router`.
///
/// # Example
/// ```ignore
/// let gate = Arc::new(AuthGate::new(codec, rules, roles, login_model));
/// let app = auth::protect(router, gate);
/// ```
pub fn protect<R, M>(router: Router, gate: Arc<AuthGate<R, M>>) -> Router
where
    R: RoleDecoder + Send + Sync + 'static,
    M: LoginModelDecoder + Send + Sync + 'static,
    R::Role: Clone + Send + Sync + 'static,
    M::Model: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, authenticate::<R, M>))
}

/// Authenticate one request and attach the resulting security context.
///
/// Rejections never reach the inner router; they render as the constant
/// 401 here. The failure kind is logged and goes no further.
async fn authenticate<R, M>(
    State(gate): State<Arc<AuthGate<R, M>>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: RoleDecoder + Send + Sync + 'static,
    M: LoginModelDecoder + Send + Sync + 'static,
    R::Role: Clone + Send + Sync + 'static,
    M::Model: Clone + Send + Sync + 'static,
{
    let (mut parts, body) = req.into_parts();

    match gate.authenticate(&parts) {
        AuthDecision::Bypass => {
            let ctx = SecurityContext::<R::Role, M::Model>::no_login(&parts);
            parts.extensions.insert(ctx);
            next.run(Request::from_parts(parts, body)).await
        }
        AuthDecision::Authorized(identity) => {
            parts
                .extensions
                .insert(SecurityContext::LoggedIn(identity));
            next.run(Request::from_parts(parts, body)).await
        }
        AuthDecision::Rejected(err) => {
            match err {
                AuthError::SignatureInvalid => {
                    tracing::debug!(path = %parts.uri.path(), "Token signature mismatch");
                }
                ref err => {
                    tracing::debug!(
                        path = %parts.uri.path(),
                        error = %err,
                        "Request rejected by authentication gate"
                    );
                }
            }
            err.into_response()
        }
    }
}
