#![allow(dead_code)]

use std::sync::Arc;

use authgate::api::AccountProfile;
use authgate::auth::{
    self, AuthGate, Base64JsonLoginModel, BypassRules, DelimitedRoleDecoder, RequireLogin,
};
use authgate::jwt::TokenCodec;
use authgate::{ServerConfig, create_app};
use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response, header},
    routing,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-testing-only";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: TEST_SECRET.to_vec(),
        discovery_path: "/openapi.json".to_string(),
        schema_path: "/openapi.json/schema".to_string(),
        status_path: "/status".to_string(),
        login_path: "/authentication".to_string(),
    }
}

/// The default application as `main` would build it.
pub fn app() -> Router {
    create_app(&test_config())
}

/// A downstream-style deployment: business routes composed with the gate
/// the way an embedding service would wire it.
pub fn orders_app() -> Router {
    let bypass = BypassRules::new()
        .read_only("/status")
        .any_method("/authentication");

    let gate = Arc::new(AuthGate::new(
        TokenCodec::new(TEST_SECRET),
        bypass,
        DelimitedRoleDecoder::default(),
        Base64JsonLoginModel::<AccountProfile>::new(),
    ));

    let router = Router::new()
        .route("/status", routing::get(|| async { "ok" }))
        .route("/orders", routing::get(list_orders));

    auth::protect(router, gate)
}

async fn list_orders(
    RequireLogin(identity): RequireLogin<String, AccountProfile>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "orders": [],
        "login": identity.login(),
        "roles": identity.roles(),
    }))
}

/// URL-safe base64 JSON login-model payload for `login`.
pub fn profile_payload(login: &str) -> String {
    URL_SAFE_NO_PAD.encode(format!(r#"{{"login":"{}"}}"#, login))
}

/// Mint a valid token for the test secret.
pub fn mint_token(subject: &str, roles: &str) -> String {
    TokenCodec::new(TEST_SECRET)
        .sign(subject, roles, &profile_payload(subject))
        .unwrap()
}

/// Flip one byte of the token's signature segment.
pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
    bytes[0] ^= 0x01;
    format!("{}.{}", head, URL_SAFE_NO_PAD.encode(bytes))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
