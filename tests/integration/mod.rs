//! Integration tests

mod config_tests;
mod decision_tests;
mod gate_tests;
mod server_tests;
