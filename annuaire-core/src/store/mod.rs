//! Persistence port for directory users and its PostgreSQL adapter.

use async_trait::async_trait;

use crate::error::Result;
use crate::user::User;

pub mod postgres;

pub use postgres::PostgresUserStore;

// User lookup and persistence port
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by primary key.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Fetch a user by unique login name.
    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>>;

    /// Persist every mutable field of `user`, returning the stored row.
    async fn update(&self, user: &User) -> Result<User>;

    /// Cheap connectivity probe for health reporting.
    async fn ping(&self) -> Result<()>;
}
