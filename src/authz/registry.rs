//! Permission registry
//!
//! The registry is the only source of truth for which permission codes
//! exist. It is built once, then shared read-only behind an `Arc`.

use super::catalog::{CatalogTable, FLEET_CATALOG};
use super::types::PermissionCode;
use crate::config::{PermissionEntryConfig, PermissionModuleConfig};
use crate::utils::error::{AdminError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A single permission with its human label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionEntry {
    pub code: PermissionCode,
    pub label: String,
}

/// Named group of permissions owned by one resource module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionModule {
    /// Module key, also the prefix of every code it owns
    pub key: String,
    /// Display name
    pub name: String,
    /// Permissions in declaration order
    pub permissions: Vec<PermissionEntry>,
}

/// Immutable catalog of all permission codes
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    modules: Vec<PermissionModule>,
    /// Code -> index into `modules`
    index: HashMap<PermissionCode, usize>,
}

impl PermissionRegistry {
    /// Registry holding the built-in fleet catalog
    pub fn fleet_default() -> Self {
        Self::from_table(FLEET_CATALOG)
    }

    /// Built-in tables are checked by the catalog tests, so codes are taken as-is.
    fn from_table(table: CatalogTable) -> Self {
        let mut registry = Self {
            modules: Vec::with_capacity(table.len()),
            index: HashMap::new(),
        };

        for (position, (key, name, permissions)) in table.iter().enumerate() {
            let permissions = permissions
                .iter()
                .map(|(code, label)| {
                    let code = PermissionCode::from_static(*code);
                    registry.index.insert(code.clone(), position);
                    PermissionEntry {
                        code,
                        label: label.to_string(),
                    }
                })
                .collect();

            registry.modules.push(PermissionModule {
                key: key.to_string(),
                name: name.to_string(),
                permissions,
            });
        }

        registry
    }

    /// Build a registry from module definitions, validating every code
    pub fn from_modules(modules: Vec<PermissionModuleConfig>) -> Result<Self> {
        let mut registry = Self {
            modules: Vec::with_capacity(modules.len()),
            index: HashMap::new(),
        };
        let mut keys = HashSet::new();

        for module in modules {
            if module.key.is_empty() {
                return Err(AdminError::config("Permission module key cannot be empty"));
            }
            if !keys.insert(module.key.clone()) {
                return Err(AdminError::config(format!(
                    "Duplicate permission module: {}",
                    module.key
                )));
            }

            let position = registry.modules.len();
            let mut permissions = Vec::with_capacity(module.permissions.len());

            for PermissionEntryConfig { code, label } in module.permissions {
                let code = PermissionCode::parse(&code)
                    .map_err(|e| AdminError::config(e.to_string()))?;

                if code.module() != module.key {
                    return Err(AdminError::config(format!(
                        "Permission {} does not belong to module {}",
                        code, module.key
                    )));
                }
                if registry.index.insert(code.clone(), position).is_some() {
                    return Err(AdminError::config(format!(
                        "Duplicate permission code: {code}"
                    )));
                }

                permissions.push(PermissionEntry { code, label });
            }

            registry.modules.push(PermissionModule {
                key: module.key,
                name: module.name,
                permissions,
            });
        }

        debug!(
            "Permission registry built with {} modules and {} codes",
            registry.modules.len(),
            registry.index.len()
        );
        Ok(registry)
    }

    /// Module owning `code`, or an `UnknownPermission` error
    pub fn lookup(&self, code: &str) -> Result<&PermissionModule> {
        PermissionCode::parse(code)
            .ok()
            .and_then(|parsed| self.index.get(&parsed))
            .map(|&position| &self.modules[position])
            .ok_or_else(|| AdminError::unknown_permission(code))
    }

    /// Validate a raw code against the catalog
    pub fn resolve_code(&self, code: &str) -> Result<PermissionCode> {
        let parsed =
            PermissionCode::parse(code).map_err(|_| AdminError::unknown_permission(code))?;
        if self.index.contains_key(&parsed) {
            Ok(parsed)
        } else {
            Err(AdminError::unknown_permission(code))
        }
    }

    pub fn contains(&self, code: &PermissionCode) -> bool {
        self.index.contains_key(code)
    }

    /// Every code in the catalog
    pub fn all_codes(&self) -> HashSet<PermissionCode> {
        self.index.keys().cloned().collect()
    }

    /// Modules in declaration order
    pub fn modules(&self) -> &[PermissionModule] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Lazily yield `(module, permission)` pairs whose code or label contains
    /// `query`, ignoring case, in declaration order.
    ///
    /// Calling `search` again restarts from the beginning.
    pub fn search<'a>(
        &'a self,
        query: &str,
    ) -> impl Iterator<Item = (&'a PermissionModule, &'a PermissionEntry)> + use<'a> {
        let needle = query.to_lowercase();
        self.modules.iter().flat_map(move |module| {
            let needle = needle.clone();
            module
                .permissions
                .iter()
                .filter(move |entry| {
                    entry.code.as_str().to_lowercase().contains(&needle)
                        || entry.label.to_lowercase().contains(&needle)
                })
                .map(move |entry| (module, entry))
        })
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::fleet_default()
    }
}
