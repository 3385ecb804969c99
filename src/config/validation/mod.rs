//! Configuration validation
//!
//! Each configuration section validates itself; `ConsoleConfig` adds the
//! cross-section checks that tie roles and actors to the catalog.

mod trait_def;
mod validators;


pub use trait_def::Validate;
