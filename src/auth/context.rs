//! Request-scoped security context types.

use axum::http::request::Parts;

/// Verified identity attached to an authorized request.
///
/// Immutable once built; lives as long as the request. Structural
/// equality is derived so two authentications of the same token compare
/// equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity<Role, Model> {
    login: String,
    roles: Vec<Role>,
    login_model: Model,
}

impl<Role, Model> Identity<Role, Model> {
    /// Build an identity from verified, decoded claim values.
    ///
    /// Pure construction; the gate is the only producer.
    pub fn new(login: impl Into<String>, roles: Vec<Role>, login_model: Model) -> Self {
        Self {
            login: login.into(),
            roles,
            login_model,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn login_model(&self) -> &Model {
        &self.login_model
    }
}

/// Security context attached to every request that passes the gate.
///
/// Exactly one of two states reaches downstream handlers: a no-login
/// context from a bypass rule, or a fully verified identity. Nothing
/// partial exists.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityContext<Role, Model> {
    /// Request was bypassed; no identity is available.
    NoLogin {
        /// Request path at the time the context was created
        path: String,
        /// Raw query string, if any
        query: Option<String>,
    },
    /// Request carried a verified token.
    LoggedIn(Identity<Role, Model>),
}

impl<Role, Model> SecurityContext<Role, Model> {
    /// No-login context for a bypassed request.
    pub fn no_login(parts: &Parts) -> Self {
        Self::NoLogin {
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    /// The verified identity, if any. `None` denies every check that
    /// requires a real identity.
    pub fn identity(&self) -> Option<&Identity<Role, Model>> {
        match self {
            Self::LoggedIn(identity) => Some(identity),
            Self::NoLogin { .. } => None,
        }
    }

    pub fn login(&self) -> Option<&str> {
        self.identity().map(Identity::login)
    }
}
