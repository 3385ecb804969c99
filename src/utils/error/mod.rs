//! Error handling for the admin gateway
//!
//! This module defines the crate-wide error type, its constructor helpers and
//! the HTTP error response mapping.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{AdminError, Result};
