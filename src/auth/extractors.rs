//! Axum extractors for handler-side access to the security context.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::context::{Identity, SecurityContext};
use super::errors::unauthorized_response;

/// Rejection for [`RequireLogin`]: the same constant 401 the gate emits.
#[derive(Debug)]
pub struct NotLoggedIn;

impl IntoResponse for NotLoggedIn {
    fn into_response(self) -> Response {
        unauthorized_response()
    }
}

/// Extractor for handlers that require a verified identity.
///
/// Rejects bypassed requests (their no-login context denies every
/// identity-requiring check) and requests on routes not behind the gate.
pub struct RequireLogin<Role, Model>(pub Identity<Role, Model>);

impl<S, Role, Model> FromRequestParts<S> for RequireLogin<Role, Model>
where
    S: Send + Sync,
    Role: Clone + Send + Sync + 'static,
    Model: Clone + Send + Sync + 'static,
{
    type Rejection = NotLoggedIn;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SecurityContext<Role, Model>>() {
            Some(SecurityContext::LoggedIn(identity)) => Ok(RequireLogin(identity.clone())),
            _ => Err(NotLoggedIn),
        }
    }
}

/// Optional identity extractor - never fails.
/// Useful for handlers that also serve bypassed requests.
pub struct MaybeLogin<Role, Model>(pub Option<Identity<Role, Model>>);

impl<S, Role, Model> FromRequestParts<S> for MaybeLogin<Role, Model>
where
    S: Send + Sync,
    Role: Clone + Send + Sync + 'static,
    Model: Clone + Send + Sync + 'static,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<SecurityContext<Role, Model>>() {
            Some(SecurityContext::LoggedIn(identity)) => Some(identity.clone()),
            _ => None,
        };
        Ok(MaybeLogin(identity))
    }
}
