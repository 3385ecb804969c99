//! Configuration management for the console
//!
//! Loads the YAML file, applies environment overrides, validates every
//! section and builds the authorization components the server runs on.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::authz::{ActorDirectory, DecisionEngine, InMemoryRoleStore, PermissionRegistry};
use crate::utils::error::{AdminError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Main configuration struct for the console
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AdminError::config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::parse_yaml(&content)?;
        config.apply_env()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document without touching the environment
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config = Self::parse_yaml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `FLEETGATE_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.console.apply_env()
    }

    fn parse_yaml(content: &str) -> Result<Self> {
        let console: ConsoleConfig = serde_yaml::from_str(content)
            .map_err(|e| AdminError::config(format!("Failed to parse config: {}", e)))?;
        Ok(Self { console })
    }

    pub fn server(&self) -> &ServerConfig {
        &self.console.server
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.console.logging
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.console.auth
    }

    pub fn authz(&self) -> &AuthzConfig {
        &self.console.authz
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.console.validate().map_err(AdminError::config)?;
        models::auth::warn_insecure_config(&self.console.auth);

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Permission registry from the configured catalog, or the built-in one
    pub fn build_registry(&self) -> Result<PermissionRegistry> {
        if self.console.catalog.is_empty() {
            Ok(PermissionRegistry::fleet_default())
        } else {
            PermissionRegistry::from_modules(self.console.catalog.clone())
        }
    }

    /// Decision engine over the configured catalog and action policy
    pub fn build_engine(&self) -> Result<DecisionEngine> {
        let registry = Arc::new(self.build_registry()?);
        Ok(DecisionEngine::with_policy(
            registry,
            self.console.authz.action_policy,
        ))
    }

    pub fn build_role_store(&self) -> InMemoryRoleStore {
        InMemoryRoleStore::with_roles(self.console.roles.iter().cloned())
    }

    pub fn build_directory(&self) -> ActorDirectory {
        ActorDirectory::with_actors(self.console.actors.iter().cloned())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.console)
            .map_err(|e| AdminError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
