//! HTTP server implementation
//!
//! Route admission runs as middleware in front of every handler; the JSON
//! API exposes the catalog, the caller's session and decision checks.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod sessions;
pub mod state;


pub use builder::run_server;
pub use server::HttpServer;
pub use sessions::SessionRegistry;
pub use state::AppState;
