//! User repository
//!
//! Credentials live with the upstream identity provider; this table only
//! maps usernames to stable ids so lists and items can reference them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::Username;

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a username. Fails with `Conflict` if it is taken.
    pub async fn create(&self, username: &Username) -> Result<User, DbError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::conflict_or(e, "user", username.as_str()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Look up a user by exact username.
    pub async fn find_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// All users ordered by username.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, username, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}
