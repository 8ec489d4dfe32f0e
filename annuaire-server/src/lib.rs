//! Application library for the Annuaire server binary.
//!
//! The binary in `main.rs` wires configuration, the connection pool, and
//! the router together; everything it assembles lives here so integration
//! tests can build the same application against a test store.

pub mod auth;
pub mod infra;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;
