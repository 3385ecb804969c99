//! Render gating, wrapping and route admission

use crate::common::{admin_role, engine, viewer_role};
use fleetgate::authz::{
    ACCESS_DENIED_MESSAGE, Action, Actor, ActorSession, Admission, AdmissionRequest, Gate,
    GateOutcome, GateState, RenderOptions, Requirement, RouteAdmission, SessionManager, ViewGate,
};
use std::collections::HashMap;
use std::sync::Arc;

fn manager_for(actor: Option<Actor>) -> Arc<SessionManager> {
    let manager = Arc::new(SessionManager::new(Arc::new(engine())));
    let ticket = manager.begin_resolution();
    if let Some(actor) = actor {
        let roles: HashMap<_, _> = [viewer_role(), admin_role()]
            .into_iter()
            .map(|role| (role.id.clone(), role))
            .collect();
        let session = ActorSession::resolve(manager.engine().registry(), &actor, &roles);
        manager.complete_resolution(ticket, session).unwrap();
    }
    manager
}

fn viewer() -> Option<Actor> {
    Some(Actor::new("ana", "Ana").with_role("viewer"))
}

#[test]
fn test_denial_maps_identically_across_call_shapes() {
    let gate = Gate::new(manager_for(viewer()));
    let options = RenderOptions::default();

    let single = gate
        .guard("user.delete", Action::Delete, || "panel", None, &options)
        .unwrap();
    let any = gate
        .guard_many(&["user.delete", "role.delete"], false, Action::Delete, || "panel", None, &options)
        .unwrap();
    let all = gate
        .guard_many(&["user.view", "user.delete"], true, Action::Delete, || "panel", None, &options)
        .unwrap();

    let expected = GateOutcome::AccessDenied(ACCESS_DENIED_MESSAGE.into());
    assert_eq!(single, expected);
    assert_eq!(any, expected);
    assert_eq!(all, expected);
}

#[test]
fn test_fallback_and_silent_denial() {
    let gate = Gate::new(manager_for(viewer()));

    let with_fallback = gate
        .guard("user.delete", Action::Delete, || "panel", Some("read-only"), &RenderOptions::default())
        .unwrap();
    assert_eq!(with_fallback, GateOutcome::Fallback("read-only"));

    let silent = gate
        .guard("user.delete", Action::Delete, || "panel", None, &RenderOptions::silent())
        .unwrap();
    assert_eq!(silent, GateOutcome::Nothing);
}

#[test]
fn test_pending_session_renders_loading() {
    let gate = Gate::new(manager_for(None));
    let outcome = gate
        .guard("user.view", Action::View, || "panel", Some("fallback"), &RenderOptions::default())
        .unwrap();
    assert!(outcome.is_loading());
}

#[test]
fn test_wrapped_operation_keeps_signature() {
    let gate = Gate::new(manager_for(viewer()));

    let rename = gate.wrap(Requirement::one("user.edit"), Action::Edit, |name: &str| {
        name.to_uppercase()
    });
    assert_eq!(rename.call("ana").unwrap(), GateOutcome::Nothing);

    let rename = rename.with_fallback(|name: &str| name.to_string());
    assert_eq!(
        rename.call("ana").unwrap(),
        GateOutcome::Fallback("ana".to_string())
    );

    let show = gate.wrap(Requirement::any(["user.view"]), Action::View, |id: u32| id * 2);
    assert_eq!(show.call(21).unwrap().content(), Some(42));
}

#[test]
fn test_view_gate_restarts_on_session_change() {
    let manager = manager_for(None);
    let mut view = ViewGate::new(Requirement::one("user.view"), Action::View);
    assert_eq!(view.state(), GateState::Unevaluated);
    assert_eq!(view.evaluate(&manager).unwrap(), GateState::Pending);

    let mut events = manager.subscribe();
    let ticket = manager.begin_resolution();
    let roles: HashMap<_, _> = [("viewer".to_string(), viewer_role())].into_iter().collect();
    let session = ActorSession::resolve(
        manager.engine().registry(),
        &Actor::new("ana", "Ana").with_role("viewer"),
        &roles,
    );
    manager.complete_resolution(ticket, session).unwrap();
    assert_eq!(view.evaluate(&manager).unwrap(), GateState::Allowed);

    // Terminal for this render cycle until the session changes again.
    manager.clear();
    assert_eq!(view.evaluate(&manager).unwrap(), GateState::Allowed);

    while let Ok(event) = events.try_recv() {
        view.on_session_event(&event);
    }
    assert_eq!(view.state(), GateState::Pending);
    assert_eq!(view.evaluate(&manager).unwrap(), GateState::Denied);
}

#[test]
fn test_route_admission_scenarios() {
    let admission = RouteAdmission::new("/login", "/inventory");

    assert_eq!(
        admission.admit(&AdmissionRequest::new("/dashboard", None)),
        Admission::RedirectTo("/login".to_string())
    );
    assert_eq!(
        admission.admit(&AdmissionRequest::new("/login", Some("token"))),
        Admission::RedirectTo("/inventory".to_string())
    );
    assert_eq!(
        admission.admit(&AdmissionRequest::new("/dashboard", Some("token"))),
        Admission::Continue
    );
    assert_eq!(
        admission.admit(&AdmissionRequest::new("/login", None)),
        Admission::Continue
    );
}

#[test]
fn test_admission_ignores_permissions() {
    // A token for an actor with no grants is still admitted; fine-grained
    // checks happen after admission.
    let admission = RouteAdmission::new("/login", "/inventory");
    let manager = manager_for(Some(Actor::new("zoe", "Zoe")));

    assert_eq!(
        admission.admit(&AdmissionRequest::new("/users", Some("token"))),
        Admission::Continue
    );
    assert!(!manager
        .has_permission("user.view", Action::View)
        .unwrap()
        .is_allowed());
}
