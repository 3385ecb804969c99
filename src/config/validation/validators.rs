//! Validator implementations for each configuration section

use super::trait_def::Validate;
use crate::authz::PermissionRegistry;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Number of workers must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Number of workers should not exceed 1000".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating auth configuration");

        if self.jwt_secret.is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }

        if self.jwt_secret.len() < 32 {
            return Err("JWT secret should be at least 32 characters long".to_string());
        }

        if self.jwt_issuer.is_empty() {
            return Err("JWT issuer cannot be empty".to_string());
        }

        if self.session_cookie.is_empty() {
            return Err("Session cookie name cannot be empty".to_string());
        }

        for (name, path) in [("Login", &self.login_path), ("Landing", &self.landing_path)] {
            if !path.starts_with('/') {
                return Err(format!("{name} path must start with '/': {path}"));
            }
        }

        if self.login_path.trim_end_matches('/') == self.landing_path.trim_end_matches('/') {
            return Err("Login and landing paths must differ".to_string());
        }

        if let Some(path) = self.public_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(format!("Public path must start with '/': {path}"));
        }

        Ok(())
    }
}

impl Validate for ConsoleConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {e}"))?;
        self.logging
            .validate()
            .map_err(|e| format!("Logging config error: {e}"))?;
        self.auth
            .validate()
            .map_err(|e| format!("Auth config error: {e}"))?;

        let registry = if self.catalog.is_empty() {
            PermissionRegistry::fleet_default()
        } else {
            PermissionRegistry::from_modules(self.catalog.clone())
                .map_err(|e| format!("Catalog error: {e}"))?
        };

        let mut role_ids = HashSet::new();
        for role in &self.roles {
            if role.id.is_empty() {
                return Err("Role id cannot be empty".to_string());
            }
            if !role_ids.insert(role.id.as_str()) {
                return Err(format!("Duplicate role: {}", role.id));
            }
            if let Some(code) = role.permissions.iter().find(|c| !registry.contains(c)) {
                return Err(format!(
                    "Role {} grants permission {} which is not in the catalog",
                    role.id, code
                ));
            }
        }

        let mut actor_ids = HashSet::new();
        for actor in &self.actors {
            if actor.id.is_empty() {
                return Err("Actor id cannot be empty".to_string());
            }
            if !actor_ids.insert(actor.id.as_str()) {
                return Err(format!("Duplicate actor: {}", actor.id));
            }
            if let Some(role) = actor.roles.iter().find(|r| !role_ids.contains(r.as_str())) {
                return Err(format!(
                    "Actor {} is assigned unknown role {}",
                    actor.id, role
                ));
            }
        }

        Ok(())
    }
}
