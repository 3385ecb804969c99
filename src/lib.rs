//! # fleetgate
//!
//! Permission evaluation core for the fleet and tire inventory console.
//!
//! ## Features
//!
//! - **Permission registry**: the catalog of `<module>.<verb>` codes, grouped by module
//! - **Actor sessions**: effective permission sets resolved from role grants
//! - **Decision engine**: single, any-of and all-of checks with a pending state
//! - **Gates**: render gating, guarded operations and route admission
//!
//! ## Checking a permission
//!
//! ```rust,no_run
//! use fleetgate::authz::{Action, ActorSession, DecisionEngine, PermissionRegistry};
//! use std::sync::Arc;
//!
//! let engine = DecisionEngine::new(Arc::new(PermissionRegistry::fleet_default()));
//! let decision = engine.check_one(&ActorSession::anonymous(), "tire.view", Action::View)?;
//! assert!(!decision.is_allowed());
//! # Ok::<(), fleetgate::AdminError>(())
//! ```
//!
//! ## Server mode
//!
//! ```rust,no_run
//! use fleetgate::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/fleetgate.yaml").await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod authz;
pub mod config;
pub mod server;
pub mod utils;

pub use authz::{
    Action, Actor, ActorSession, Decision, DecisionEngine, PermissionCode, PermissionRegistry,
    Requirement, Role, SessionManager,
};
pub use config::Config;
pub use utils::error::{AdminError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
