//! Core library for the Annuaire directory service.
//!
//! Holds everything the HTTP layer builds on: the [`user::User`] profile
//! model, the [`store::UserStore`] persistence port with its PostgreSQL
//! adapter, password hashing, and the embedded database migrations.

pub mod crypto;
pub mod error;
pub mod store;
pub mod user;

pub use error::{Result, StoreError};
pub use user::User;

/// Embedded database migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
