//! Token signing and verification.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Verified token claims.
///
/// `role` and `login_model` are opaque encoded payloads; the gate hands
/// them to the configured decoders without interpreting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (login identifier)
    pub sub: String,
    /// Encoded role payload
    pub role: String,
    /// Encoded login-model payload
    #[serde(rename = "loginModel")]
    pub login_model: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Token lifetime used when minting: 1 hour
pub const TOKEN_DURATION_SECS: u64 = 60 * 60;

/// Signs and verifies bearer tokens against a shared secret.
///
/// The secret is loaded once at startup; verification holds no mutable
/// state and is safe to call from concurrent requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from the shared HMAC secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a signed token carrying the given claim payloads.
    ///
    /// The gate never calls this; it exists for tests and operator
    /// tooling. Token issuance endpoints are out of scope.
    pub fn sign(&self, subject: &str, role: &str, login_model: &str) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TokenError::TimeError)?
            .as_secs();

        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            login_model: login_model.to_string(),
            iat: now,
            exp: now + TOKEN_DURATION_SECS,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Verify a token's signature and structure, returning its claims.
    ///
    /// A signature mismatch is an expected outcome, reported as
    /// [`TokenError::Signature`] rather than folded into a generic decode
    /// failure. Expiry is checked by the library against `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::Signature,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e),
            })?;

        Ok(token_data.claims)
    }
}

/// Errors that can occur during token operations.
#[derive(Debug)]
pub enum TokenError {
    /// Error encoding a token
    Encoding(jsonwebtoken::errors::Error),
    /// Signature does not match the shared secret
    Signature,
    /// Token is past its expiration time
    Expired,
    /// Any other structural or parse failure
    Malformed(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            TokenError::Signature => write!(f, "Token signature mismatch"),
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::Malformed(e) => write!(f, "Malformed token: {}", e),
            TokenError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for TokenError {}
