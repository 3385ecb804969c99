//! Top-level console configuration

use super::*;
use crate::authz::{Actor, Role};
use crate::utils::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Every configuration section of the console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub authz: AuthzConfig,
    /// Permission catalog; the built-in fleet catalog is used when empty
    #[serde(default)]
    pub catalog: Vec<PermissionModuleConfig>,
    /// Role records served by the in-memory role store
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Actor records served by the in-memory actor directory
    #[serde(default)]
    pub actors: Vec<Actor>,
}

impl ConsoleConfig {
    /// Override settings from `FLEETGATE_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        debug!("Applying environment overrides");

        if let Ok(host) = env::var("FLEETGATE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("FLEETGATE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| AdminError::config(format!("Invalid port: {}", e)))?;
        }
        if let Ok(workers) = env::var("FLEETGATE_WORKERS") {
            self.server.workers = Some(
                workers
                    .parse()
                    .map_err(|e| AdminError::config(format!("Invalid workers count: {}", e)))?,
            );
        }
        if let Ok(level) = env::var("FLEETGATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("FLEETGATE_LOG_JSON") {
            self.logging.json = json
                .parse()
                .map_err(|e| AdminError::config(format!("Invalid log json flag: {}", e)))?;
        }
        if let Ok(secret) = env::var("FLEETGATE_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(cookie) = env::var("FLEETGATE_SESSION_COOKIE") {
            self.auth.session_cookie = cookie;
        }

        Ok(())
    }
}
