//! Session and authorization endpoints

use crate::authz::{Action, ActorSession, Decision, Requirement, SessionManager};
use crate::server::middleware::extract_session_token;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::{AdminError, Result};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/session")
            .route(web::get().to(current_session))
            .route(web::delete().to(end_session)),
    )
    .route("/api/authorize", web::post().to(authorize));
}

/// Public view of a resolved session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub actor_id: Option<String>,
    pub actor_name: Option<String>,
    pub roles: BTreeSet<String>,
    pub permissions: Vec<String>,
    pub active: bool,
    pub loading: bool,
    pub generation: u64,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<&ActorSession> for SessionView {
    fn from(session: &ActorSession) -> Self {
        Self {
            actor_id: session.actor_id().map(str::to_string),
            actor_name: session.actor_name().map(str::to_string),
            roles: session.roles().clone(),
            permissions: session
                .sorted_permissions()
                .into_iter()
                .map(|code| code.as_str().to_string())
                .collect(),
            active: session.is_active(),
            loading: session.is_loading(),
            generation: session.generation(),
            resolved_at: session.resolved_at(),
        }
    }
}

/// Requirement mode accepted by `/api/authorize`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementMode {
    One,
    Any,
    All,
}

/// Body of `/api/authorize`
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub mode: RequirementMode,
    pub codes: Vec<String>,
    #[serde(default = "default_action")]
    pub action: Action,
}

fn default_action() -> Action {
    Action::View
}

impl AuthorizeRequest {
    fn requirement(&self) -> Result<Requirement> {
        match self.mode {
            RequirementMode::One => match self.codes.as_slice() {
                [code] => Ok(Requirement::one(code.clone())),
                _ => Err(AdminError::validation(
                    "Mode 'one' takes exactly one permission code",
                )),
            },
            RequirementMode::Any => Ok(Requirement::any(self.codes.iter().cloned())),
            RequirementMode::All => Ok(Requirement::all(self.codes.iter().cloned())),
        }
    }
}

/// Decision returned by `/api/authorize`
#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub decision: Decision,
}

async fn resolve_caller(state: &AppState, req: &HttpRequest) -> Result<Arc<SessionManager>> {
    let token = extract_session_token(req.headers(), &state.config.auth().session_cookie)
        .ok_or_else(|| AdminError::unauthenticated("No session token"))?;

    state
        .sessions
        .get_or_resolve(&token)
        .await?
        .ok_or_else(|| AdminError::unauthenticated("Session token does not identify an actor"))
}

async fn current_session(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let manager = resolve_caller(&state, &req).await?;
    let session = manager
        .snapshot()
        .ok_or_else(|| AdminError::unauthenticated("Session has ended"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SessionView::from(session.as_ref()))))
}

/// Evaluate a requirement for the caller.
///
/// Codes come from the request body here, so catalog errors are the client's.
async fn authorize(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AuthorizeRequest>,
) -> Result<HttpResponse> {
    let requirement = body.requirement()?;
    let manager = resolve_caller(&state, &req).await?;

    let decision = manager
        .evaluate(&requirement, body.action)
        .map_err(|e| match e {
            AdminError::UnknownPermission(_) | AdminError::ActionMismatch { .. } => {
                AdminError::validation(e.to_string())
            }
            other => other,
        })?;

    debug!(?requirement, %decision, "Authorization requested");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AuthorizeResponse { decision })))
}

async fn end_session(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let token = extract_session_token(req.headers(), &state.config.auth().session_cookie)
        .ok_or_else(|| AdminError::unauthenticated("No session token"))?;

    if state.sessions.end(&token) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AdminError::not_found("No active session for this token"))
    }
}
