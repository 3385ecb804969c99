//! Configuration data models
//!
//! This module defines all configuration structures used by the console.

pub mod auth;
pub mod authz;
pub mod console;
pub mod logging;
pub mod server;

pub use auth::*;
pub use authz::*;
pub use console::*;
pub use logging::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default log filter
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default session cookie name
pub fn default_session_cookie() -> String {
    "token".to_string()
}

/// Unauthenticated entry point
pub fn default_login_path() -> String {
    "/login".to_string()
}

/// Where authenticated actors land when they hit the login page
pub fn default_landing_path() -> String {
    "/inventory".to_string()
}

/// Paths admitted without a session
pub fn default_public_paths() -> Vec<String> {
    vec![
        "/health".to_string(),
        "/static/".to_string(),
        "/favicon.ico".to_string(),
    ]
}

/// Placeholder secret for local development only
pub const DEV_JWT_SECRET: &str = "fleetgate-development-secret-change-me-now";

pub fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

pub fn default_jwt_issuer() -> String {
    "fleetgate".to_string()
}
