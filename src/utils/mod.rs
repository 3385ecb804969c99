//! Utility modules for the console
//!
//! - **error**: error taxonomy and HTTP error responses
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{AdminError, Result};
pub use logging::{SECURITY_TARGET, init_tracing};
