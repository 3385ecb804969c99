//! Application state shared across HTTP handlers

use crate::authz::{DecisionEngine, RouteAdmission, TokenVerifier};
use crate::config::Config;
use crate::server::sessions::SessionRegistry;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc so cloning per worker is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Console configuration (shared read-only)
    pub config: Arc<Config>,
    /// Decision engine over the configured catalog
    pub engine: Arc<DecisionEngine>,
    /// Resolved sessions keyed by token
    pub sessions: Arc<SessionRegistry>,
    /// Route admission rules
    pub admission: Arc<RouteAdmission>,
}

impl AppState {
    /// Build every component from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        let engine = Arc::new(config.build_engine()?);
        let sessions = SessionRegistry::new(
            Arc::clone(&engine),
            Arc::new(TokenVerifier::from_config(config.auth())),
            Arc::new(config.build_directory()),
            Arc::new(config.build_role_store()),
        );
        let admission = RouteAdmission::from_config(config.auth());

        Ok(Self {
            config: Arc::new(config),
            engine,
            sessions: Arc::new(sessions),
            admission: Arc::new(admission),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
