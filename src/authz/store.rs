//! Role storage collaborator
//!
//! The decision core never assumes a transport or persistence shape for
//! roles. It talks to a [`RoleStore`]; the in-memory store here backs the
//! console when roles come from configuration.

use super::types::Role;
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Notification that a role record changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChange {
    Upserted(String),
    Removed(String),
}

impl RoleChange {
    pub fn role_id(&self) -> &str {
        match self {
            RoleChange::Upserted(id) | RoleChange::Removed(id) => id,
        }
    }
}

/// Source of role records
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch a role, `None` when the id is unknown
    async fn get_role(&self, role_id: &str) -> Result<Option<Role>>;

    /// All roles, sorted by id
    async fn list_roles(&self) -> Result<Vec<Role>>;

    /// Fetch every listed role, failing on the first missing id
    async fn get_roles(&self, role_ids: &BTreeSet<String>) -> Result<HashMap<String, Role>> {
        let mut roles = HashMap::new();
        for role_id in role_ids {
            let role = self
                .get_role(role_id)
                .await?
                .ok_or_else(|| AdminError::role_not_found(role_id.as_str()))?;
            roles.insert(role_id.clone(), role);
        }
        Ok(roles)
    }
}

/// Concurrent in-memory role store
#[derive(Debug)]
pub struct InMemoryRoleStore {
    roles: DashMap<String, Role>,
    changes: broadcast::Sender<RoleChange>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(256);
        Self {
            roles: DashMap::new(),
            changes,
        }
    }

    /// Seed the store; later entries with the same id replace earlier ones
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let store = Self::new();
        for role in roles {
            store.roles.insert(role.id.clone(), role);
        }
        info!("Role store initialized with {} roles", store.roles.len());
        store
    }

    /// Create or replace a role.
    ///
    /// A system role keeps its name and its system flag.
    pub fn upsert_role(&self, role: Role) -> Result<()> {
        if let Some(existing) = self.roles.get(&role.id) {
            if existing.system && (existing.name != role.name || !role.system) {
                return Err(AdminError::conflict(format!(
                    "System role {} cannot be renamed",
                    role.id
                )));
            }
        }

        let role_id = role.id.clone();
        self.roles.insert(role_id.clone(), role);
        debug!(role = %role_id, "Role upserted");
        // No subscribers is fine.
        let _ = self.changes.send(RoleChange::Upserted(role_id));
        Ok(())
    }

    /// Delete a non-system role
    pub fn remove_role(&self, role_id: &str) -> Result<Role> {
        if let Some(existing) = self.roles.get(role_id) {
            if existing.system {
                return Err(AdminError::conflict(format!(
                    "System role {role_id} cannot be deleted"
                )));
            }
        }

        let (_, role) = self
            .roles
            .remove(role_id)
            .ok_or_else(|| AdminError::not_found(format!("Role {role_id}")))?;
        debug!(role = %role_id, "Role removed");
        let _ = self.changes.send(RoleChange::Removed(role_id.to_string()));
        Ok(role)
    }

    /// Subscribe to role changes
    pub fn subscribe(&self) -> broadcast::Receiver<RoleChange> {
        self.changes.subscribe()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for InMemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn get_role(&self, role_id: &str) -> Result<Option<Role>> {
        Ok(self.roles.get(role_id).map(|entry| entry.value().clone()))
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.iter().map(|entry| entry.value().clone()).collect();
        roles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(roles)
    }
}
