//! Error type definitions

use thiserror::Error;

/// Result type alias for the admin gateway
pub type Result<T> = std::result::Result<T, AdminError>;

/// Main error type for the admin gateway
///
/// Authorization outcomes (`Allowed`, `Denied`, `Pending`) are values, not
/// errors. The variants here are reserved for conditions that must reach a
/// developer or an operator.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A permission code that is not part of the registry
    #[error("Unknown permission code: {0}")]
    UnknownPermission(String),

    /// A role reference that the role store cannot resolve
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// A permission code checked against an action it does not govern
    #[error("Permission {code} does not govern the '{action}' action")]
    ActionMismatch { code: String, action: String },

    /// Missing or invalid session
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
