pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;

use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;

use api::AccountProfile;
use auth::{AuthGate, Base64JsonLoginModel, BypassRules, DelimitedRoleDecoder};
use jwt::TokenCodec;

pub struct ServerConfig {
    /// Shared HMAC secret for token verification
    pub jwt_secret: Vec<u8>,
    /// Discovery document path, bypassed for read-only methods
    pub discovery_path: String,
    /// Discovery schema sub-resource path, bypassed for read-only methods
    pub schema_path: String,
    /// Status endpoint path, bypassed for read-only methods
    pub status_path: String,
    /// Login endpoint path, bypassed for any method. No route is mounted
    /// here; the surrounding deployment provides the login handler.
    pub login_path: String,
}

/// Create the application router with the given configuration.
///
/// Every route, including the bypassed ones, sits behind the gate; the
/// bypass rules are what let the public paths through.
pub fn create_app(config: &ServerConfig) -> Router {
    let codec = TokenCodec::new(&config.jwt_secret);

    let bypass = BypassRules::new()
        .read_only(&config.discovery_path)
        .read_only(&config.schema_path)
        .read_only(&config.status_path)
        .any_method(&config.login_path);

    let gate = Arc::new(AuthGate::new(
        codec,
        bypass,
        DelimitedRoleDecoder::default(),
        Base64JsonLoginModel::<AccountProfile>::new(),
    ));

    let router = Router::new()
        .route(&config.status_path, get(api::status))
        .route(&config.discovery_path, get(api::discovery_document))
        .route(&config.schema_path, get(api::discovery_schema))
        .route("/whoami", get(api::whoami));

    auth::protect(router, gate)
}

/// Run the server on the given listener. This function blocks until the
/// server exits.
pub async fn run_server(
    config: &ServerConfig,
    listener: TcpListener,
) -> Result<(), std::io::Error> {
    let app = create_app(config);
    axum::serve(listener, app).await
}
