//! Requests exempted from authentication.

use axum::http::Method;

/// Paths that skip authentication entirely.
///
/// Two rule classes: paths bypassed only under read-only methods
/// (discovery documents, status probes) and paths bypassed under any
/// method (the login endpoint, which must be reachable to obtain a token
/// in the first place). Built once at startup, immutable afterwards.
///
/// Matching is exact per normalized path: case-insensitive, with leading
/// and trailing slashes ignored.
#[derive(Debug, Clone, Default)]
pub struct BypassRules {
    read_only: Vec<String>,
    any_method: Vec<String>,
}

impl BypassRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass `path` for read-only (GET/HEAD) requests.
    pub fn read_only(mut self, path: &str) -> Self {
        self.read_only.push(normalize(path));
        self
    }

    /// Bypass `path` for any request method.
    pub fn any_method(mut self, path: &str) -> Self {
        self.any_method.push(normalize(path));
        self
    }

    /// Whether a request to `path` with `method` skips authentication.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        let path = normalize(path);

        if self.any_method.iter().any(|p| *p == path) {
            return true;
        }

        is_read_only(method) && self.read_only.iter().any(|p| *p == path)
    }
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_ascii_lowercase()
}
