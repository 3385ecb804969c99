//! HTTP error response mapping

use super::types::AdminError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Unauthenticated(_) | AdminError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AdminError::Validation(_) | AdminError::Serialization(_) | AdminError::Yaml(_) => {
                StatusCode::BAD_REQUEST
            }
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Conflict(_) => StatusCode::CONFLICT,
            AdminError::Config(_)
            | AdminError::UnknownPermission(_)
            | AdminError::RoleNotFound(_)
            | AdminError::ActionMismatch { .. }
            | AdminError::Internal(_)
            | AdminError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AdminError::Io(_) | AdminError::Internal(_) => "An internal error occurred".to_string(),
            AdminError::Jwt(_) => "Invalid session token".to_string(),
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        })
    }
}
