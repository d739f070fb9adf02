//! The authentication decision for a single request.

use axum::http::{header, request::Parts};

use super::bypass::BypassRules;
use super::context::Identity;
use super::decoders::{LoginModelDecoder, RoleDecoder};
use super::errors::AuthError;
use crate::jwt::{TokenCodec, TokenError};

/// Fixed `Authorization` header prefix, with exactly one trailing space.
pub const AUTH_HEADER_VALUE_PREFIX: &str = "Bearer ";

/// Query parameter consulted when no `Authorization` header is present.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Outcome of authenticating one request.
#[derive(Debug)]
pub enum AuthDecision<Role, Model> {
    /// Request matches a bypass rule; proceed with a no-login context.
    Bypass,
    /// Token verified and decoded; proceed with this identity.
    Authorized(Identity<Role, Model>),
    /// Request must not proceed.
    Rejected(AuthError),
}

/// Per-request authentication gate.
///
/// Holds the token codec, the bypass rules, and one decoder for each of
/// the two opaque claim payloads, all fixed at startup. `authenticate`
/// performs no I/O and mutates nothing, so one gate instance serves
/// concurrent requests.
pub struct AuthGate<R, M> {
    codec: TokenCodec,
    bypass: BypassRules,
    role_decoder: R,
    login_model_decoder: M,
}

impl<R, M> AuthGate<R, M>
where
    R: RoleDecoder,
    M: LoginModelDecoder,
{
    pub fn new(
        codec: TokenCodec,
        bypass: BypassRules,
        role_decoder: R,
        login_model_decoder: M,
    ) -> Self {
        Self {
            codec,
            bypass,
            role_decoder,
            login_model_decoder,
        }
    }

    /// Decide whether this request head is bypassed, authorized, or
    /// rejected.
    ///
    /// Every internal failure (missing token, bad signature, decode
    /// failure) collapses to `Rejected`; the variants stay distinct for
    /// logging only.
    pub fn authenticate(&self, parts: &Parts) -> AuthDecision<R::Role, M::Model> {
        if self.bypass.matches(&parts.method, parts.uri.path()) {
            return AuthDecision::Bypass;
        }

        let token = match locate_token(parts) {
            Ok(token) => token,
            Err(e) => return AuthDecision::Rejected(e),
        };

        let claims = match self.codec.verify(&token) {
            Ok(claims) => claims,
            Err(TokenError::Signature) => {
                return AuthDecision::Rejected(AuthError::SignatureInvalid);
            }
            Err(_) => return AuthDecision::Rejected(AuthError::MalformedToken),
        };

        let roles = match self.role_decoder.decode_roles(&claims.role) {
            Ok(roles) => roles,
            Err(e) => return AuthDecision::Rejected(AuthError::ClaimDecode(e)),
        };

        let login_model = match self
            .login_model_decoder
            .decode_login_model(parts, &claims.login_model)
        {
            Ok(model) => model,
            Err(e) => return AuthDecision::Rejected(AuthError::ClaimDecode(e)),
        };

        AuthDecision::Authorized(Identity::new(claims.sub, roles, login_model))
    }
}

/// Find the raw token for a request.
///
/// The `Authorization` header takes precedence: when present it must
/// carry the exact `Bearer ` prefix and a non-empty token, and a header
/// that fails those checks rejects the request rather than falling back
/// to the query parameter.
fn locate_token(parts: &Parts) -> Result<String, AuthError> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MalformedToken)?;
        let token = value
            .strip_prefix(AUTH_HEADER_VALUE_PREFIX)
            .ok_or(AuthError::MalformedToken)?;
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        return Ok(token.to_string());
    }

    let token = query_token(parts).ok_or(AuthError::MissingToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decoders::{Base64JsonLoginModel, DelimitedRoleDecoder};
    use axum::http::{Method, Request};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &[u8] = b"test-secret-key-for-testing";

    fn gate() -> AuthGate<DelimitedRoleDecoder, Base64JsonLoginModel<serde_json::Value>> {
        let bypass = BypassRules::new()
            .read_only("/status")
            .any_method("/authentication");
        AuthGate::new(
            TokenCodec::new(SECRET),
            bypass,
            DelimitedRoleDecoder::default(),
            Base64JsonLoginModel::new(),
        )
    }

    fn model_payload() -> String {
        URL_SAFE_NO_PAD.encode(br#"{"login":"alice"}"#)
    }

    fn token(role: &str, login_model: &str) -> String {
        TokenCodec::new(SECRET)
            .sign("alice", role, login_model)
            .unwrap()
    }

    fn parts(method: Method, uri: &str, auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bypass_ignores_credentials() {
        // Junk header must not matter on a bypassed path
        let parts = parts(Method::GET, "/status", Some("Bearer garbage"));
        assert!(matches!(gate().authenticate(&parts), AuthDecision::Bypass));
    }

    #[test]
    fn test_login_path_bypassed_for_post() {
        let parts = parts(Method::POST, "/authentication", None);
        assert!(matches!(gate().authenticate(&parts), AuthDecision::Bypass));
    }

    #[test]
    fn test_no_token_rejected() {
        let parts = parts(Method::GET, "/orders", None);
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::MissingToken) => {}
            other => panic!("expected MissingToken, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_header_token_authorized() {
        let token = token("admin,user", &model_payload());
        let parts = parts(
            Method::GET,
            "/orders",
            Some(&format!("Bearer {}", token)),
        );

        match gate().authenticate(&parts) {
            AuthDecision::Authorized(identity) => {
                assert_eq!(identity.login(), "alice");
                assert_eq!(identity.roles(), ["admin", "user"]);
                assert_eq!(identity.login_model()["login"], "alice");
            }
            other => panic!("expected Authorized, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_query_token_authorized() {
        let token = token("user", &model_payload());
        let parts = parts(Method::GET, &format!("/orders?token={}", token), None);

        match gate().authenticate(&parts) {
            AuthDecision::Authorized(identity) => {
                assert_eq!(identity.login(), "alice");
                assert_eq!(identity.roles(), ["user"]);
            }
            other => panic!("expected Authorized, got {:?}", other),
        }
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        // Valid query token, broken header: the header wins and rejects
        let valid = token("user", &model_payload());
        let parts = parts(
            Method::GET,
            &format!("/orders?token={}", valid),
            Some("Bearer tampered-token"),
        );
        assert!(matches!(
            gate().authenticate(&parts),
            AuthDecision::Rejected(_)
        ));
    }

    #[test]
    fn test_valid_header_with_garbage_query_authorized() {
        let valid = token("user", &model_payload());
        let parts = parts(
            Method::GET,
            "/orders?token=garbage",
            Some(&format!("Bearer {}", valid)),
        );
        assert!(matches!(
            gate().authenticate(&parts),
            AuthDecision::Authorized(_)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = token("user", &model_payload());
        let (head, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.as_bytes()[0] == b'A' { 'B' } else { 'A' };
        let token = format!("{}.{}{}", head, flipped, &signature[1..]);

        let parts = parts(Method::GET, "/orders", Some(&format!("Bearer {}", token)));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::SignatureInvalid) => {}
            other => panic!("expected SignatureInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_scheme_rejected_as_malformed() {
        let parts = parts(Method::GET, "/orders", Some("Basic YWxpY2U6cHc="));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::MalformedToken) => {}
            other => panic!("expected MalformedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let token = token("user", &model_payload());
        let parts = parts(Method::GET, "/orders", Some(&format!("bearer {}", token)));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::MalformedToken) => {}
            other => panic!("expected MalformedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bearer_token_missing() {
        let parts = parts(Method::GET, "/orders", Some("Bearer "));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::MissingToken) => {}
            other => panic!("expected MissingToken, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_query_token_missing() {
        let parts = parts(Method::GET, "/orders?token=", None);
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::MissingToken) => {}
            other => panic!("expected MissingToken, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_role_claim_rejected() {
        let token = token("", &model_payload());
        let parts = parts(Method::GET, "/orders", Some(&format!("Bearer {}", token)));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::ClaimDecode(_)) => {}
            other => panic!("expected ClaimDecode, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_login_model_rejected() {
        let token = token("user", "not base64!!!");
        let parts = parts(Method::GET, "/orders", Some(&format!("Bearer {}", token)));
        match gate().authenticate(&parts) {
            AuthDecision::Rejected(AuthError::ClaimDecode(_)) => {}
            other => panic!("expected ClaimDecode, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_authentication_is_idempotent() {
        let token = token("admin", &model_payload());
        let gate = gate();

        let first = parts(Method::GET, "/orders", Some(&format!("Bearer {}", token)));
        let second = parts(Method::GET, "/orders", Some(&format!("Bearer {}", token)));

        match (gate.authenticate(&first), gate.authenticate(&second)) {
            (AuthDecision::Authorized(a), AuthDecision::Authorized(b)) => assert_eq!(a, b),
            other => panic!("expected two Authorized outcomes, got {:?}", other),
        }
    }
}
