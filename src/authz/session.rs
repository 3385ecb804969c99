//! Actor session resolution
//!
//! An [`ActorSession`] is an immutable snapshot of an actor's effective
//! permission set. Sessions are never edited in place: a role change or a
//! new login produces a new snapshot that replaces the old one wholesale.

use super::registry::PermissionRegistry;
use super::types::{Actor, PermissionCode, Role};
use crate::utils::error::{AdminError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Synchronous role lookup used while resolving a session
pub trait RoleLookup {
    fn lookup_role(&self, role_id: &str) -> Option<Role>;
}

impl<F> RoleLookup for F
where
    F: Fn(&str) -> Option<Role>,
{
    fn lookup_role(&self, role_id: &str) -> Option<Role> {
        self(role_id)
    }
}

impl RoleLookup for HashMap<String, Role> {
    fn lookup_role(&self, role_id: &str) -> Option<Role> {
        self.get(role_id).cloned()
    }
}

/// Resolved, read-only view of an actor's permissions
#[derive(Debug, Clone, Serialize)]
pub struct ActorSession {
    actor_id: Option<String>,
    actor_name: Option<String>,
    roles: BTreeSet<String>,
    permissions: HashSet<PermissionCode>,
    active: bool,
    loading: bool,
    failure: Option<String>,
    generation: u64,
    resolved_at: Option<DateTime<Utc>>,
}

impl ActorSession {
    /// Session whose identity and roles are still being fetched
    pub fn pending(generation: u64) -> Self {
        Self {
            actor_id: None,
            actor_name: None,
            roles: BTreeSet::new(),
            permissions: HashSet::new(),
            active: false,
            loading: true,
            failure: None,
            generation,
            resolved_at: None,
        }
    }

    /// Resolved session for a context with no authenticated actor
    pub fn anonymous() -> Self {
        Self {
            loading: false,
            ..Self::pending(0)
        }
    }

    /// Resolve `actor` into a session using `roles` for role records.
    ///
    /// Every assigned role must resolve and every granted code must exist in
    /// `registry`. Inactive actors resolve to an empty permission set.
    pub fn resolve(
        registry: &PermissionRegistry,
        actor: &Actor,
        roles: &dyn RoleLookup,
    ) -> Result<Self> {
        let mut permissions = HashSet::new();

        for role_id in &actor.roles {
            let role = roles
                .lookup_role(role_id)
                .ok_or_else(|| AdminError::role_not_found(role_id.as_str()))?;

            for code in &role.permissions {
                if !registry.contains(code) {
                    return Err(AdminError::unknown_permission(format!(
                        "{} (granted by role {})",
                        code, role.id
                    )));
                }
                permissions.insert(code.clone());
            }
        }

        if !actor.active {
            debug!(actor = %actor.id, "Actor is inactive, dropping all grants");
            permissions.clear();
        }

        Ok(Self {
            actor_id: Some(actor.id.clone()),
            actor_name: Some(actor.name.clone()),
            roles: actor.roles.clone(),
            permissions,
            active: actor.active,
            loading: false,
            failure: None,
            generation: 0,
            resolved_at: Some(Utc::now()),
        })
    }

    /// Terminal session for a resolution that failed; it grants nothing
    pub fn failed(generation: u64, reason: impl Into<String>) -> Self {
        Self {
            loading: false,
            failure: Some(reason.into()),
            resolved_at: Some(Utc::now()),
            ..Self::pending(generation)
        }
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the resolved permission set contains `code`
    pub fn grants(&self, code: &PermissionCode) -> bool {
        self.permissions.contains(code)
    }

    pub fn permissions(&self) -> &HashSet<PermissionCode> {
        &self.permissions
    }

    /// Granted codes sorted for display
    pub fn sorted_permissions(&self) -> Vec<&PermissionCode> {
        let mut codes: Vec<_> = self.permissions.iter().collect();
        codes.sort();
        codes
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn actor_name(&self) -> Option<&str> {
        self.actor_name.as_deref()
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Resolution sequence number this snapshot belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }
}
