//! Authorization configuration

use crate::authz::ActionPolicy;
use serde::{Deserialize, Serialize};

/// Decision engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// How the action argument takes part in matching
    #[serde(default)]
    pub action_policy: ActionPolicy,
}

/// One permission module of a configured catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionModuleConfig {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionEntryConfig>,
}

/// One permission in a configured catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntryConfig {
    pub code: String,
    pub label: String,
}
