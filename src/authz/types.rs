//! Authorization type definitions

use crate::utils::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Permission identifier of the shape `<module>.<verb>`
///
/// A code only says what it names. Whether it exists is answered by the
/// [`PermissionRegistry`](super::PermissionRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Parse a code, rejecting anything that is not `<module>.<verb>`
    pub fn parse(code: &str) -> Result<Self> {
        let (module, verb) = code
            .split_once('.')
            .ok_or_else(|| AdminError::validation(format!("Malformed permission code: {code}")))?;

        let well_formed = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };

        if !well_formed(module) || !well_formed(verb) {
            return Err(AdminError::validation(format!(
                "Malformed permission code: {code}"
            )));
        }

        Ok(Self(code.to_string()))
    }

    /// Only for compile-time catalog tables, which are validated by tests
    pub(super) fn from_static(code: &'static str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource part of the code (`user` in `user.view`)
    pub fn module(&self) -> &str {
        self.0.split_once('.').map(|(m, _)| m).unwrap_or(&self.0)
    }

    /// Verb part of the code (`view` in `user.view`)
    pub fn verb(&self) -> &str {
        self.0.split_once('.').map(|(_, v)| v).unwrap_or("")
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = AdminError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PermissionCode> for String {
    fn from(code: PermissionCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PermissionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Action a caller intends to perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Approve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Approve => "approve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdminError::validation(format!("Unknown action: {s}")))
    }
}

/// Role definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Role description
    #[serde(default)]
    pub description: String,
    /// Permissions granted by this role, in declaration order
    #[serde(default)]
    pub permissions: Vec<PermissionCode>,
    /// System roles cannot be deleted or renamed
    #[serde(default)]
    pub system: bool,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            permissions: Vec::new(),
            system: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a grant; malformed codes are rejected here, unknown ones at resolution
    pub fn grant(mut self, code: &str) -> Result<Self> {
        let code = PermissionCode::parse(code)?;
        if !self.permissions.contains(&code) {
            self.permissions.push(code);
        }
        Ok(self)
    }

    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }
}

/// Authenticated identity with its role assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Assigned role identifiers
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Inactive actors fail every check
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            roles: BTreeSet::new(),
            active: true,
        }
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.roles.insert(role_id.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
