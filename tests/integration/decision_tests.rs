//! Decision engine scenarios and properties

use crate::common::{admin_role, engine, resolved_session, roles_by_id, viewer_role};
use fleetgate::authz::{
    Action, ActionPolicy, Actor, ActorSession, Decision, DecisionEngine, PermissionRegistry,
    Requirement, Role,
};
use fleetgate::AdminError;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

#[test]
fn test_viewer_cannot_delete_users() {
    let roles = roles_by_id([viewer_role()]);
    let session = resolved_session(&Actor::new("ana", "Ana").with_role("viewer"), &roles);

    assert_eq!(
        engine().check_one(&session, "user.delete", Action::Delete).unwrap(),
        Decision::Denied
    );
}

#[test]
fn test_union_of_roles_satisfies_all_of() {
    let roles = roles_by_id([admin_role(), viewer_role()]);
    let actor = Actor::new("beto", "Beto").with_role("admin").with_role("viewer");
    let session = resolved_session(&actor, &roles);

    assert_eq!(
        engine()
            .check_all(&session, &["user.view", "user.delete"], Action::View)
            .unwrap(),
        Decision::Allowed
    );
}

#[test]
fn test_inactive_admin_is_denied() {
    let roles = roles_by_id([admin_role()]);
    let actor = Actor::new("carla", "Carla").with_role("admin").inactive();
    let session = resolved_session(&actor, &roles);

    assert!(session.permissions().is_empty());
    assert_eq!(
        engine().check_one(&session, "user.view", Action::View).unwrap(),
        Decision::Denied
    );
}

#[test]
fn test_loading_session_is_pending() {
    let session = ActorSession::pending(1);
    assert_eq!(
        engine().check_any(&session, &["user.view"], Action::View).unwrap(),
        Decision::Pending
    );
}

#[test]
fn test_loading_session_is_pending_even_for_unknown_codes() {
    let session = ActorSession::pending(1);
    let engine = engine();

    assert_eq!(
        engine.check_one(&session, "nope.nothing", Action::View).unwrap(),
        Decision::Pending
    );
    assert_eq!(
        engine.check_all(&session, &["bogus"], Action::View).unwrap(),
        Decision::Pending
    );
}

#[test]
fn test_unknown_code_is_configuration_error() {
    let roles = roles_by_id([admin_role()]);
    let session = resolved_session(&Actor::new("beto", "Beto").with_role("admin"), &roles);
    let engine = engine();

    let err = engine
        .check_one(&session, "user.impersonate", Action::View)
        .unwrap_err();
    assert!(matches!(err, AdminError::UnknownPermission(_)));
    assert!(err.is_configuration_error());

    // Unknown codes fail even when a known, granted code comes first.
    let err = engine
        .check_any(&session, &["user.view", "user.impersonate"], Action::View)
        .unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_empty_code_lists_are_asymmetric() {
    let roles = roles_by_id([viewer_role()]);
    let session = resolved_session(&Actor::new("ana", "Ana").with_role("viewer"), &roles);
    let engine = engine();
    let none: [&str; 0] = [];

    assert_eq!(engine.check_any(&session, &none, Action::View).unwrap(), Decision::Denied);
    assert_eq!(engine.check_all(&session, &none, Action::View).unwrap(), Decision::Allowed);
}

#[test]
fn test_action_aware_policy() {
    let roles = roles_by_id([admin_role()]);
    let session = resolved_session(&Actor::new("beto", "Beto").with_role("admin"), &roles);
    let engine = DecisionEngine::with_policy(
        Arc::new(PermissionRegistry::fleet_default()),
        ActionPolicy::ActionAware,
    );

    assert_eq!(
        engine.check_one(&session, "user.delete", Action::Delete).unwrap(),
        Decision::Allowed
    );
    let err = engine
        .check_one(&session, "user.delete", Action::View)
        .unwrap_err();
    assert!(matches!(err, AdminError::ActionMismatch { .. }));
}

#[test]
fn test_evaluate_dispatches_on_requirement() {
    let roles = roles_by_id([viewer_role()]);
    let session = resolved_session(&Actor::new("ana", "Ana").with_role("viewer"), &roles);
    let engine = engine();

    let any = Requirement::any(["user.delete", "user.view"]);
    let all = Requirement::all(["user.delete", "user.view"]);
    assert_eq!(engine.evaluate(&session, &any, Action::View).unwrap(), Decision::Allowed);
    assert_eq!(engine.evaluate(&session, &all, Action::View).unwrap(), Decision::Denied);
}

fn catalog_codes() -> Vec<String> {
    PermissionRegistry::fleet_default()
        .modules()
        .iter()
        .flat_map(|module| module.permissions.iter())
        .map(|entry| entry.code.as_str().to_string())
        .collect()
}

fn code_subset() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(catalog_codes(), 0..=catalog_codes().len())
}

fn session_granting(granted: &[String], active: bool) -> ActorSession {
    let mut role = Role::new("generated", "Generated");
    for code in granted {
        role = role.grant(code).unwrap();
    }
    let mut actor = Actor::new("prop", "Prop").with_role("generated");
    actor.active = active;

    let roles: HashMap<String, Role> = [("generated".to_string(), role)].into_iter().collect();
    ActorSession::resolve(&PermissionRegistry::fleet_default(), &actor, &roles).unwrap()
}

proptest! {
    #[test]
    fn prop_pending_regardless_of_codes(codes in prop::collection::vec("[a-z.]{0,12}", 0..6)) {
        let session = ActorSession::pending(7);
        let engine = engine();
        for code in &codes {
            prop_assert_eq!(engine.check_one(&session, code, Action::View).unwrap(), Decision::Pending);
        }
        prop_assert_eq!(engine.check_any(&session, &codes, Action::View).unwrap(), Decision::Pending);
        prop_assert_eq!(engine.check_all(&session, &codes, Action::View).unwrap(), Decision::Pending);
    }

    #[test]
    fn prop_inactive_actor_denied_everywhere(granted in code_subset(), queried in code_subset()) {
        let session = session_granting(&granted, false);
        let engine = engine();

        prop_assert!(session.permissions().is_empty());
        for code in &queried {
            prop_assert_eq!(engine.check_one(&session, code, Action::View).unwrap(), Decision::Denied);
        }
        prop_assert_eq!(engine.check_any(&session, &queried, Action::View).unwrap(), Decision::Denied);
        if !queried.is_empty() {
            prop_assert_eq!(engine.check_all(&session, &queried, Action::View).unwrap(), Decision::Denied);
        }
    }

    #[test]
    fn prop_any_and_all_match_set_semantics(granted in code_subset(), queried in code_subset()) {
        let session = session_granting(&granted, true);
        let engine = engine();

        let expect_any = queried.iter().any(|code| granted.contains(code));
        let expect_all = queried.iter().all(|code| granted.contains(code));

        prop_assert_eq!(
            engine.check_any(&session, &queried, Action::View).unwrap().is_allowed(),
            expect_any
        );
        prop_assert_eq!(
            engine.check_all(&session, &queried, Action::View).unwrap().is_allowed(),
            expect_all
        );
    }

    #[test]
    fn prop_order_does_not_matter(granted in code_subset(), queried in code_subset()) {
        let session = session_granting(&granted, true);
        let engine = engine();
        let mut reversed = queried.clone();
        reversed.reverse();

        prop_assert_eq!(
            engine.check_any(&session, &queried, Action::View).unwrap(),
            engine.check_any(&session, &reversed, Action::View).unwrap()
        );
        prop_assert_eq!(
            engine.check_all(&session, &queried, Action::View).unwrap(),
            engine.check_all(&session, &reversed, Action::View).unwrap()
        );
    }

    #[test]
    fn prop_evaluation_is_idempotent(granted in code_subset(), queried in code_subset()) {
        let session = session_granting(&granted, true);
        let engine = engine();
        let before = session.sorted_permissions().len();

        let first = engine.check_all(&session, &queried, Action::View).unwrap();
        let second = engine.check_all(&session, &queried, Action::View).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(session.sorted_permissions().len(), before);
    }
}
