//! PostgreSQL adapter for the [`UserStore`] port.
//!
//! Constraint violations are classified into [`StoreError::Validation`] and
//! [`StoreError::Conflict`] with messages safe to show to clients. Anything
//! else stays a [`StoreError::Database`] for the caller to log.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::store::UserStore;
use crate::user::User;

/// PostgreSQL-backed implementation of the [`UserStore`] port.
#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, user_name, password_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, user_name, password_hash,
                   created_at, updated_at
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2,
                last_name = $3,
                user_name = $4,
                password_hash = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, user_name, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(classify)?
        .ok_or(StoreError::NotFound)?;

        info!("Updated user: {} ({})", updated.user_name, updated.id);

        Ok(updated)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;

        Ok(())
    }
}

/// Map a driver error onto the store's taxonomy.
fn classify(err: sqlx::Error) -> StoreError {
    let (kind, constraint) = match err.as_database_error() {
        Some(db_err) => (db_err.kind(), db_err.constraint().map(str::to_owned)),
        None => return StoreError::Database(err),
    };

    match kind {
        ErrorKind::UniqueViolation => {
            StoreError::Conflict("Ce nom d'utilisateur est déjà utilisé.".to_string())
        }
        ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
            StoreError::Validation(validation_message(constraint.as_deref()).to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn validation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_first_name_check") => "Le prénom ne peut pas être vide.",
        Some("users_last_name_check") => "Le nom ne peut pas être vide.",
        Some("users_user_name_check") => "Le nom d'utilisateur ne peut pas être vide.",
        _ => "Les informations fournies sont invalides.",
    }
}
