//! Handlers for the endpoints this service exposes.
//!
//! The interesting routes of a real deployment live downstream of the
//! gate; what ships here is the public surface the bypass rules point at
//! (status, discovery) plus `whoami`, which demonstrates reading the
//! verified identity from a handler.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::RequireLogin;

/// Role values for this deployment: plain role names.
pub type Role = String;

/// Login model for this deployment.
///
/// The token's `loginModel` claim carries this as URL-safe base64 JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub login: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness/status probe. Bypassed for read-only methods.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Discovery document. Bypassed for read-only methods.
pub async fn discovery_document() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "authgate",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/status": { "get": { "summary": "Service status" } },
            "/whoami": { "get": { "summary": "Verified identity of the caller" } },
        },
    }))
}

/// Schema sub-resource of the discovery document.
pub async fn discovery_schema() -> Json<Value> {
    Json(json!({
        "components": {
            "schemas": {
                "AccountProfile": {
                    "type": "object",
                    "required": ["login"],
                    "properties": {
                        "login": { "type": "string" },
                        "display_name": { "type": "string" },
                    },
                },
            },
        },
    }))
}

#[derive(Serialize)]
pub struct WhoamiResponse {
    pub login: String,
    pub roles: Vec<Role>,
    pub profile: AccountProfile,
}

/// Echo the caller's verified identity.
pub async fn whoami(
    RequireLogin(identity): RequireLogin<Role, AccountProfile>,
) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        login: identity.login().to_string(),
        roles: identity.roles().to_vec(),
        profile: identity.login_model().clone(),
    })
}
