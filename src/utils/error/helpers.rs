//! Helper constructors and classification for [`AdminError`]

use super::types::AdminError;

impl AdminError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn unknown_permission<S: Into<String>>(code: S) -> Self {
        Self::UnknownPermission(code.into())
    }

    pub fn role_not_found<S: Into<String>>(role_id: S) -> Self {
        Self::RoleNotFound(role_id.into())
    }

    pub fn action_mismatch<C: Into<String>, A: Into<String>>(code: C, action: A) -> Self {
        Self::ActionMismatch {
            code: code.into(),
            action: action.into(),
        }
    }

    pub fn unauthenticated<S: Into<String>>(message: S) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error is a programmer or data-integrity problem.
    ///
    /// These must surface as diagnostics and are never rendered as an
    /// ordinary access-denied outcome.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnknownPermission(_)
                | Self::RoleNotFound(_)
                | Self::ActionMismatch { .. }
        )
    }

    /// Stable machine-readable code used in HTTP error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_)
            | Self::UnknownPermission(_)
            | Self::RoleNotFound(_)
            | Self::ActionMismatch { .. } => "CONFIGURATION_ERROR",
            Self::Unauthenticated(_) | Self::Jwt(_) => "UNAUTHENTICATED",
            Self::Validation(_) | Self::Serialization(_) | Self::Yaml(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) | Self::Io(_) => "INTERNAL_ERROR",
        }
    }
}
