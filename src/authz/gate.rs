//! Gate protocol
//!
//! Maps decisions onto what a caller should produce. Render gating and
//! wrapping share one mapping; they differ only in how a denial is shown.

use super::decision::{Decision, Requirement};
use super::manager::{SessionEvent, SessionManager};
use super::types::Action;
use crate::utils::error::Result;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Default notice shown for denied content
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access this content.";

/// What a gated view or operation resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// Session still resolving: show a loading placeholder
    Loading,
    /// Access granted: the protected content
    Content(T),
    /// Access denied: the caller-supplied fallback
    Fallback(T),
    /// Access denied: a visible notice
    AccessDenied(Cow<'static, str>),
    /// Access denied: nothing at all
    Nothing,
}

impl<T> GateOutcome<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, GateOutcome::Loading)
    }

    /// Protected content, if access was granted
    pub fn content(self) -> Option<T> {
        match self {
            GateOutcome::Content(value) => Some(value),
            _ => None,
        }
    }

    /// Content or fallback, whichever was produced
    pub fn into_value(self) -> Option<T> {
        match self {
            GateOutcome::Content(value) | GateOutcome::Fallback(value) => Some(value),
            _ => None,
        }
    }
}

/// How render gating presents a denial without a fallback
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_message: bool,
    pub message: Cow<'static, str>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_message: true,
            message: Cow::Borrowed(ACCESS_DENIED_MESSAGE),
        }
    }
}

impl RenderOptions {
    pub fn silent() -> Self {
        Self {
            show_message: false,
            ..Self::default()
        }
    }
}

/// Render-gating mapping
pub fn render_outcome<T>(
    decision: Decision,
    content: impl FnOnce() -> T,
    fallback: Option<T>,
    options: &RenderOptions,
) -> GateOutcome<T> {
    match decision {
        Decision::Pending => GateOutcome::Loading,
        Decision::Allowed => GateOutcome::Content(content()),
        Decision::Denied => match fallback {
            Some(fallback) => GateOutcome::Fallback(fallback),
            None if options.show_message => GateOutcome::AccessDenied(options.message.clone()),
            None => GateOutcome::Nothing,
        },
    }
}

/// Wrapping mapping: same as render gating, but never an inline notice
pub fn wrapped_outcome<T>(
    decision: Decision,
    content: impl FnOnce() -> T,
    fallback: Option<T>,
) -> GateOutcome<T> {
    render_outcome(decision, content, fallback, &RenderOptions::silent())
}

/// Gate bound to one session manager
#[derive(Debug, Clone)]
pub struct Gate {
    sessions: Arc<SessionManager>,
}

impl Gate {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Gate content on a single permission code
    pub fn guard<T>(
        &self,
        code: &str,
        action: Action,
        content: impl FnOnce() -> T,
        fallback: Option<T>,
        options: &RenderOptions,
    ) -> Result<GateOutcome<T>> {
        let decision = self.sessions.has_permission(code, action)?;
        Ok(render_outcome(decision, content, fallback, options))
    }

    /// Gate content on several codes, any-of or all-of
    pub fn guard_many<T, S: AsRef<str>>(
        &self,
        codes: &[S],
        require_all: bool,
        action: Action,
        content: impl FnOnce() -> T,
        fallback: Option<T>,
        options: &RenderOptions,
    ) -> Result<GateOutcome<T>> {
        let decision = if require_all {
            self.sessions.has_all_permissions(codes, action)?
        } else {
            self.sessions.has_any_permission(codes, action)?
        };
        Ok(render_outcome(decision, content, fallback, options))
    }

    /// Guarded version of `operation`, taking the same input
    pub fn wrap<I, O, F>(&self, requirement: Requirement, action: Action, operation: F) -> Guarded<I, O>
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Guarded {
            sessions: Arc::clone(&self.sessions),
            requirement,
            action,
            operation: Box::new(operation),
            fallback: None,
        }
    }
}

/// An operation that only runs when its requirement is met
pub struct Guarded<I, O> {
    sessions: Arc<SessionManager>,
    requirement: Requirement,
    action: Action,
    operation: Box<dyn Fn(I) -> O + Send + Sync>,
    fallback: Option<Box<dyn Fn(I) -> O + Send + Sync>>,
}

impl<I, O> fmt::Debug for Guarded<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("requirement", &self.requirement)
            .field("action", &self.action)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<I, O> Guarded<I, O> {
    /// Run `fallback` instead of producing nothing when access is denied
    pub fn with_fallback<G>(mut self, fallback: G) -> Self
    where
        G: Fn(I) -> O + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Evaluate the requirement against the current session, then run the
    /// operation or the fallback.
    pub fn call(&self, input: I) -> Result<GateOutcome<O>> {
        let decision = self.sessions.evaluate(&self.requirement, self.action)?;

        // Same mapping as `wrapped_outcome`, with the fallback fed the input.
        Ok(match decision {
            Decision::Allowed => GateOutcome::Content((self.operation)(input)),
            Decision::Denied => match &self.fallback {
                Some(fallback) => GateOutcome::Fallback(fallback(input)),
                None => GateOutcome::Nothing,
            },
            Decision::Pending => GateOutcome::Loading,
        })
    }
}

/// Evaluation state of one guarded view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unevaluated,
    Pending,
    Allowed,
    Denied,
}

/// Tracks a guarded view through `Unevaluated -> Pending -> Allowed | Denied`.
///
/// `Allowed` and `Denied` hold for the render cycle; a session event puts
/// the view back to `Pending` until it is evaluated again.
#[derive(Debug)]
pub struct ViewGate {
    requirement: Requirement,
    action: Action,
    state: GateState,
}

impl ViewGate {
    pub fn new(requirement: Requirement, action: Action) -> Self {
        Self {
            requirement,
            action,
            state: GateState::Unevaluated,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Evaluate against the manager's current session
    pub fn evaluate(&mut self, sessions: &SessionManager) -> Result<GateState> {
        if matches!(self.state, GateState::Allowed | GateState::Denied) {
            return Ok(self.state);
        }

        let decision = sessions.evaluate(&self.requirement, self.action)?;

        self.state = match decision {
            Decision::Allowed => GateState::Allowed,
            Decision::Denied => GateState::Denied,
            Decision::Pending => GateState::Pending,
        };
        Ok(self.state)
    }

    /// React to a session change
    pub fn on_session_event(&mut self, _event: &SessionEvent) {
        if self.state != GateState::Unevaluated {
            self.state = GateState::Pending;
        }
    }
}
