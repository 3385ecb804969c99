//! Configuration loading from files

use fleetgate::authz::{Action, ActionPolicy, ActorSession, Decision};
use fleetgate::config::Config;
use std::io::Write;
use tempfile::NamedTempFile;

const CUSTOM_CATALOG: &str = r#"
auth:
  jwt_secret: "integration-secret-that-is-long-enough"
  login_path: "/signin"
  landing_path: "/fleet"

authz:
  action_policy: action_aware

catalog:
  - key: fleet
    name: Fleet
    permissions:
      - { code: fleet.view, label: "View fleet" }
      - { code: fleet.approve, label: "Approve dispatch" }

roles:
  - id: dispatcher
    name: Dispatcher
    permissions: [fleet.view, fleet.approve]

actors:
  - id: d1
    name: Dora
    roles: [dispatcher]
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_custom_catalog_replaces_builtin() {
    let file = write_config(CUSTOM_CATALOG);
    let config = Config::from_file(file.path()).await.unwrap();

    let registry = config.build_registry().unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.lookup("tire.view").is_err());

    let engine = config.build_engine().unwrap();
    assert_eq!(engine.policy(), ActionPolicy::ActionAware);

    let directory = config.build_directory();
    let roles: std::collections::HashMap<_, _> = config
        .console
        .roles
        .iter()
        .map(|role| (role.id.clone(), role.clone()))
        .collect();
    let session =
        ActorSession::resolve(engine.registry(), &directory.get("d1").unwrap(), &roles).unwrap();
    assert_eq!(
        engine.check_one(&session, "fleet.approve", Action::Approve).unwrap(),
        Decision::Allowed
    );
}

#[tokio::test]
async fn test_role_granting_unknown_code_is_rejected() {
    let file = write_config(
        r#"
roles:
  - id: viewer
    name: Viewer
    permissions: [tire.view, tire.teleport]
"#,
    );
    let err = Config::from_file(file.path()).await.unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("tire.teleport"));
}

#[tokio::test]
async fn test_actor_with_unknown_role_is_rejected() {
    let file = write_config(
        r#"
actors:
  - id: a1
    name: Ana
    roles: [ghost]
"#,
    );
    assert!(Config::from_file(file.path()).await.is_err());
}

#[tokio::test]
async fn test_short_secret_is_rejected() {
    let file = write_config("auth:\n  jwt_secret: short\n");
    assert!(Config::from_file(file.path()).await.is_err());
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = Config::from_yaml_str("{}").unwrap();
    assert_eq!(config.auth().login_path, "/login");
    assert_eq!(config.auth().landing_path, "/inventory");
    assert_eq!(config.authz().action_policy, ActionPolicy::CodeOnly);
    assert!(config.build_registry().unwrap().contains(
        &fleetgate::PermissionCode::parse("tire.approve").unwrap()
    ));
}

#[tokio::test]
async fn test_example_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/fleetgate.example.yaml");
    let config = Config::from_file(path).await.unwrap();
    assert_eq!(config.console.roles.len(), 3);
    assert_eq!(config.console.actors.len(), 2);
}
