//! Authorization core
//!
//! Permission registry, actor sessions, the decision engine and the gate
//! protocol that turns decisions into render and routing outcomes.

mod admission;
mod catalog;
mod decision;
mod gate;
mod identity;
mod manager;
mod registry;
mod session;
mod store;
mod types;

pub use admission::{Admission, AdmissionRequest, RouteAdmission};
pub use decision::{ActionPolicy, Decision, DecisionEngine, Requirement};
pub use gate::{
    ACCESS_DENIED_MESSAGE, Gate, GateOutcome, GateState, Guarded, RenderOptions, ViewGate,
    render_outcome, wrapped_outcome,
};
pub use identity::{ActorDirectory, Authenticator, SessionClaims, TokenAuthenticator, TokenVerifier};
pub use manager::{ResolutionOutcome, ResolutionTicket, SessionEvent, SessionManager};
pub use registry::{PermissionEntry, PermissionModule, PermissionRegistry};
pub use session::{ActorSession, RoleLookup};
pub use store::{InMemoryRoleStore, RoleChange, RoleStore};
pub use types::{Action, Actor, PermissionCode, Role};
