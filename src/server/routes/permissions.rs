//! Permission catalog endpoints

use crate::authz::{PermissionCode, PermissionModule};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/permissions")
            .route("", web::get().to(list_permissions))
            .route("/search", web::get().to(search_permissions)),
    );
}

/// Query string for catalog search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// One search hit
#[derive(Debug, Serialize)]
pub struct PermissionMatch<'a> {
    pub module: &'a str,
    pub code: &'a PermissionCode,
    pub label: &'a str,
}

/// The whole catalog grouped by module, in declaration order
async fn list_permissions(state: web::Data<AppState>) -> HttpResponse {
    let modules: &[PermissionModule] = state.engine.registry().modules();
    HttpResponse::Ok().json(ApiResponse::success(modules))
}

/// Case-insensitive search over codes and labels
async fn search_permissions(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let matches: Vec<PermissionMatch<'_>> = state
        .engine
        .registry()
        .search(&query.q)
        .map(|(module, entry)| PermissionMatch {
            module: &module.key,
            code: &entry.code,
            label: &entry.label,
        })
        .collect();

    HttpResponse::Ok().json(ApiResponse::success(matches))
}
