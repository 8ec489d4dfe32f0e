//! User profile model for the directory service.
//!
//! ## Core Model
//!
//! - [`User`]: a directory member as stored in PostgreSQL and served by
//!   the HTTP API.
//!
//! ## Security Considerations
//!
//! - Password hashes are never serialized to prevent accidental exposure
//! - API payloads use camelCase field names; the database uses snake_case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable numeric identifier, assigned by the database
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login name, unique across the directory
    pub user_name: String,
    /// Argon2id hash in PHC string format (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Record creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time, maintained by the store
    pub updated_at: DateTime<Utc>,
}
