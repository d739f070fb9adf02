//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use clap::Parser;
use tracing::error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Authgate",
    about = "Bearer-token authentication gate in front of an API"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7302")]
    pub port: u16,

    /// Path to file containing the JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Discovery document path (bypassed for read-only methods)
    #[arg(long, default_value = "/openapi.json")]
    pub discovery_path: String,

    /// Discovery schema sub-resource path (bypassed for read-only methods)
    #[arg(long, default_value = "/openapi.json/schema")]
    pub schema_path: String,

    /// Status endpoint path (bypassed for read-only methods)
    #[arg(long, default_value = "/status")]
    pub status_path: String,

    /// Login endpoint path (bypassed for any method)
    #[arg(long, default_value = "/authentication")]
    pub login_path: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Resolve the token verification secret at startup.
///
/// Sources, in order: the JWT_SECRET environment variable, then the
/// file named by `--jwt-secret-file`. Returns None and logs an error
/// when neither yields a usable secret.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<Vec<u8>> {
    let secret = match std::env::var("JWT_SECRET") {
        Ok(value) => {
            // Drop the variable so the secret is not inherited by
            // anything spawned later.
            // SAFETY: startup is still single-threaded here and nothing
            // else reads JWT_SECRET.
            unsafe { std::env::remove_var("JWT_SECRET") };
            value.into_bytes()
        }
        Err(_) => {
            let Some(path) = jwt_secret_file else {
                error!(
                    "No JWT secret configured. Set JWT_SECRET (recommended) or pass --jwt-secret-file"
                );
                return None;
            };
            match std::fs::read_to_string(path) {
                Ok(contents) => contents.trim().as_bytes().to_vec(),
                Err(e) => {
                    error!(path = %path, error = %e, "Could not read the JWT secret file");
                    return None;
                }
            }
        }
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            minimum = MIN_JWT_SECRET_LENGTH,
            "JWT secret is too short to be safe"
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from parsed arguments.
/// Returns None and logs an error if any bypass path is unusable.
pub fn build_config(args: &Args, jwt_secret: Vec<u8>) -> Option<ServerConfig> {
    let paths = [
        ("--discovery-path", &args.discovery_path),
        ("--schema-path", &args.schema_path),
        ("--status-path", &args.status_path),
        ("--login-path", &args.login_path),
    ];

    for (option, path) in paths {
        if let Err(reason) = check_bypass_path(path) {
            error!(option = option, path = %path, "{}", reason);
            return None;
        }
    }

    Some(ServerConfig {
        jwt_secret,
        discovery_path: args.discovery_path.clone(),
        schema_path: args.schema_path.clone(),
        status_path: args.status_path.clone(),
        login_path: args.login_path.clone(),
    })
}

fn check_bypass_path(path: &str) -> Result<(), &'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err("bypass path must be absolute");
    };

    if rest.is_empty() || rest.ends_with('/') {
        return Err("bypass path must name a resource, with no trailing slash");
    }

    if !rest.chars().all(|c| c.is_ascii_graphic()) {
        return Err("bypass path may only contain printable ASCII");
    }

    Ok(())
}
