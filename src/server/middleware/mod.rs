//! HTTP middleware implementations
//!
//! - Route admission (redirects for unauthenticated or misplaced requests)
//! - Session token extraction helpers

mod admission;
mod helpers;


pub use admission::{AdmissionMiddleware, AdmissionMiddlewareService};
pub use helpers::{extract_session_token, read_cookie};
