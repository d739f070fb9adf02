//! Pluggable decoders for the opaque claim payloads.
//!
//! The `role` and `loginModel` claims are deployment-specific encodings.
//! The gate is parameterized by one implementation of each capability and
//! is otherwise agnostic to what the payloads mean.

use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// A claim payload could not be decoded.
///
/// Decoders must report failure through this type; silently substituting
/// an empty or default identity is not an option.
#[derive(Debug)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to decode claim payload: {}", self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Decodes the `role` claim into the deployment's role values.
pub trait RoleDecoder {
    type Role;

    fn decode_roles(&self, encoded: &str) -> Result<Vec<Self::Role>, DecodeError>;
}

/// Decodes the `loginModel` claim into the deployment's login model.
///
/// Receives the request head so implementations can consult request
/// context. Must be side-effect-free with respect to authentication state
/// and safe for concurrent invocation.
pub trait LoginModelDecoder {
    type Model;

    fn decode_login_model(
        &self,
        request: &Parts,
        encoded: &str,
    ) -> Result<Self::Model, DecodeError>;
}

/// Role decoder for separator-joined role lists (e.g. `admin,user`).
#[derive(Debug, Clone)]
pub struct DelimitedRoleDecoder {
    separator: char,
}

impl DelimitedRoleDecoder {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }
}

impl Default for DelimitedRoleDecoder {
    fn default() -> Self {
        Self::new(',')
    }
}

impl RoleDecoder for DelimitedRoleDecoder {
    type Role = String;

    fn decode_roles(&self, encoded: &str) -> Result<Vec<String>, DecodeError> {
        let roles: Vec<String> = encoded
            .split(self.separator)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        if roles.is_empty() {
            return Err(DecodeError::new("role claim contains no roles"));
        }

        Ok(roles)
    }
}

/// Login-model decoder for URL-safe base64 encoded JSON payloads.
#[derive(Debug, Clone)]
pub struct Base64JsonLoginModel<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Base64JsonLoginModel<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Base64JsonLoginModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> LoginModelDecoder for Base64JsonLoginModel<T> {
    type Model = T;

    fn decode_login_model(&self, _request: &Parts, encoded: &str) -> Result<T, DecodeError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| DecodeError::new(format!("invalid base64: {}", e)))?;

        serde_json::from_slice(&bytes).map_err(|e| DecodeError::new(format!("invalid JSON: {}", e)))
    }
}
