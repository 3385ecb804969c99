//! Authentication and admission configuration

use super::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session and route admission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Cookie carrying the session token
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Unauthenticated entry point
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Default authenticated landing area
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
    /// Path prefixes admitted without a session
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// HS256 secret used to verify session tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected token issuer
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            login_path: default_login_path(),
            landing_path: default_landing_path(),
            public_paths: default_public_paths(),
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
        }
    }
}

/// Warn about settings that are acceptable for development only
pub fn warn_insecure_config(config: &AuthConfig) {
    if config.jwt_secret == DEV_JWT_SECRET {
        warn!("Using the development JWT secret; set FLEETGATE_JWT_SECRET in production");
    }
}
