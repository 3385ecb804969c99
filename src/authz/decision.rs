//! Decision engine
//!
//! Pure evaluation of single, any-of and all-of permission requirements
//! against an [`ActorSession`]. Every call site (render gating, wrapping,
//! the HTTP surface) goes through [`DecisionEngine`], so the any/all rules
//! exist in exactly one place.

use super::registry::PermissionRegistry;
use super::session::ActorSession;
use super::types::{Action, PermissionCode};
use crate::utils::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allowed,
    Denied,
    /// The session is still resolving; not a denial
    Pending,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Decision::Pending)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allowed => write!(f, "allowed"),
            Decision::Denied => write!(f, "denied"),
            Decision::Pending => write!(f, "pending"),
        }
    }
}

/// How the `action` argument takes part in matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPolicy {
    /// Match on the code alone; `action` documents the call site only
    #[default]
    CodeOnly,
    /// A code whose verb names an action must be checked against that action
    ActionAware,
}

/// A permission requirement in one of the three supported shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "codes", rename_all = "lowercase")]
pub enum Requirement {
    One(String),
    Any(Vec<String>),
    All(Vec<String>),
}

impl Requirement {
    pub fn one(code: impl Into<String>) -> Self {
        Self::One(code.into())
    }

    pub fn any<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(codes.into_iter().map(Into::into).collect())
    }

    pub fn all<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::All(codes.into_iter().map(Into::into).collect())
    }
}

/// Evaluates permission requirements against actor sessions
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    registry: Arc<PermissionRegistry>,
    policy: ActionPolicy,
}

impl DecisionEngine {
    pub fn new(registry: Arc<PermissionRegistry>) -> Self {
        Self::with_policy(registry, ActionPolicy::default())
    }

    pub fn with_policy(registry: Arc<PermissionRegistry>, policy: ActionPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &Arc<PermissionRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> ActionPolicy {
        self.policy
    }

    /// Check a single permission code.
    ///
    /// Loading sessions yield `Pending` before anything else is looked at.
    /// Codes missing from the registry are errors, never `Denied`.
    pub fn check_one(&self, session: &ActorSession, code: &str, action: Action) -> Result<Decision> {
        if session.is_loading() {
            return Ok(Decision::Pending);
        }

        let code = self.validate(code, action)?;
        let decision = Self::membership(session, &code);

        debug!(
            target: "fleetgate::security",
            actor = session.actor_id().unwrap_or("-"),
            code = %code,
            action = %action,
            decision = %decision,
            "Permission check"
        );
        Ok(decision)
    }

    /// `Allowed` when at least one code is granted; an empty list is `Denied`
    pub fn check_any<S: AsRef<str>>(
        &self,
        session: &ActorSession,
        codes: &[S],
        action: Action,
    ) -> Result<Decision> {
        if session.is_loading() {
            return Ok(Decision::Pending);
        }

        let codes = self.validate_all(codes, action)?;
        let decision = if codes.iter().any(|code| session.grants(code)) {
            Decision::Allowed
        } else {
            Decision::Denied
        };

        debug!(
            target: "fleetgate::security",
            actor = session.actor_id().unwrap_or("-"),
            codes = ?codes,
            action = %action,
            decision = %decision,
            "Any-of permission check"
        );
        Ok(decision)
    }

    /// `Allowed` when every code is granted; an empty list is `Allowed`
    pub fn check_all<S: AsRef<str>>(
        &self,
        session: &ActorSession,
        codes: &[S],
        action: Action,
    ) -> Result<Decision> {
        if session.is_loading() {
            return Ok(Decision::Pending);
        }

        let codes = self.validate_all(codes, action)?;
        let decision = if codes.iter().all(|code| session.grants(code)) {
            Decision::Allowed
        } else {
            Decision::Denied
        };

        debug!(
            target: "fleetgate::security",
            actor = session.actor_id().unwrap_or("-"),
            codes = ?codes,
            action = %action,
            decision = %decision,
            "All-of permission check"
        );
        Ok(decision)
    }

    /// Dispatch a [`Requirement`] to the matching check
    pub fn evaluate(
        &self,
        session: &ActorSession,
        requirement: &Requirement,
        action: Action,
    ) -> Result<Decision> {
        match requirement {
            Requirement::One(code) => self.check_one(session, code, action),
            Requirement::Any(codes) => self.check_any(session, codes, action),
            Requirement::All(codes) => self.check_all(session, codes, action),
        }
    }

    /// Validate every code up front so an unknown code is reported no matter
    /// where it sits in the list.
    fn validate_all<S: AsRef<str>>(&self, codes: &[S], action: Action) -> Result<Vec<PermissionCode>> {
        codes
            .iter()
            .map(|code| self.validate(code.as_ref(), action))
            .collect()
    }

    fn validate(&self, code: &str, action: Action) -> Result<PermissionCode> {
        let code = self.registry.resolve_code(code)?;

        if self.policy == ActionPolicy::ActionAware {
            let verb_is_action = Action::ALL.iter().any(|a| a.as_str() == code.verb());
            if verb_is_action && code.verb() != action.as_str() {
                return Err(AdminError::action_mismatch(code.as_str(), action.as_str()));
            }
        }

        Ok(code)
    }

    fn membership(session: &ActorSession, code: &PermissionCode) -> Decision {
        if session.grants(code) {
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }
}
