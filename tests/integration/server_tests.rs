//! HTTP admission and API routes

use crate::common::{console_config, token_for};
use actix_web::http::{StatusCode, header};
use actix_web::{test, web};
use fleetgate::server::{AppState, HttpServer};
use serde_json::{Value, json};

macro_rules! app {
    ($state:expr) => {
        test::init_service(HttpServer::create_app(web::Data::new($state.clone()))).await
    };
}

fn state() -> AppState {
    AppState::new(console_config()).unwrap()
}

#[actix_web::test]
async fn test_health_is_public() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_token_redirects_to_login() {
    let state = state();
    let app = app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_web::test]
async fn test_token_at_login_redirects_to_landing() {
    let state = state();
    let token = token_for(state.config(), "ana");
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/login")
        .insert_header((header::COOKIE, format!("token={token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/inventory");
}

#[actix_web::test]
async fn test_session_view_lists_effective_permissions() {
    let state = state();
    let token = token_for(state.config(), "beto");
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/session")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["actor_id"], "beto");
    assert_eq!(body["data"]["loading"], false);
    assert_eq!(body["data"]["permissions"], json!(["user.delete", "user.view"]));
}

#[actix_web::test]
async fn test_authorize_returns_decisions() {
    let state = state();
    let token = token_for(state.config(), "ana");
    let app = app!(state);

    let cases = [
        (json!({"mode": "one", "codes": ["user.view"]}), "allowed"),
        (json!({"mode": "one", "codes": ["user.delete"], "action": "delete"}), "denied"),
        (json!({"mode": "any", "codes": []}), "denied"),
        (json!({"mode": "all", "codes": []}), "allowed"),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/api/authorize")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(&payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["decision"], expected, "payload: {payload}");
    }
}

#[actix_web::test]
async fn test_authorize_rejects_unknown_codes() {
    let state = state();
    let token = token_for(state.config(), "ana");
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/authorize")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({"mode": "one", "codes": ["user.teleport"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_inactive_actor_is_denied() {
    let state = state();
    let token = token_for(state.config(), "carla");
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/authorize")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({"mode": "one", "codes": ["user.view"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["decision"], "denied");
}

#[actix_web::test]
async fn test_forged_token_is_unauthorized() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/session")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_ends_session() {
    let state = state();
    let token = token_for(state.config(), "dario");
    let app = app!(state);

    let get = || {
        test::TestRequest::get()
            .uri("/api/session")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request()
    };
    assert_eq!(test::call_service(&app, get()).await.status(), StatusCode::OK);
    assert_eq!(state.sessions.len(), 1);

    let delete = test::TestRequest::delete()
        .uri("/api/session")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, delete).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(state.sessions.is_empty());
}

#[actix_web::test]
async fn test_permission_catalog_and_search() {
    let state = state();
    let token = token_for(state.config(), "ana");
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/permissions")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["key"], "dashboard");

    let req = test::TestRequest::get()
        .uri("/api/permissions/search?q=APPROVE")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["code"], "tire.approve");
}

#[::core::prelude::v1::test]
fn test_server_builds_from_config() {
    let server = HttpServer::new(console_config()).unwrap();
    assert_eq!(server.config().port, 8080);
    assert_eq!(server.state().sessions.len(), 0);
}
