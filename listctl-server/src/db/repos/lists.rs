//! List repository
//!
//! Handles list CRUD with proper patterns:
//! - get: loads the full aggregate (items with creators, members)
//! - create: list row + creator membership in one transaction
//! - add_member: INSERT OR IGNORE (idempotent)

use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use super::{ItemRepo, TodoItem, User};
use crate::db::DbError;
use crate::models::ListTitle;

/// List id and title, for the overview
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ListSummary {
    pub id: i64,
    pub title: String,
}

/// Fully loaded list aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoList {
    pub id: i64,
    pub title: String,
    /// Insertion order
    pub items: Vec<TodoItem>,
    /// Ordered by username
    pub members: Vec<User>,
}

impl TodoList {
    /// Membership test, the only authorization gate for writes.
    pub fn is_member(&self, user: &User) -> bool {
        self.members.iter().any(|m| m.id == user.id)
    }
}

/// List repository
pub struct ListRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ListRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All lists, id and title only.
    pub async fn list_summaries(&self) -> Result<Vec<ListSummary>, DbError> {
        let lists = sqlx::query_as("SELECT id, title FROM todo_lists ORDER BY id ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(lists)
    }

    /// Load a list with its items and members.
    ///
    /// Three queries regardless of list size.
    pub async fn get(&self, id: i64) -> Result<TodoList, DbError> {
        let summary: ListSummary = sqlx::query_as("SELECT id, title FROM todo_lists WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "list",
                id: id.to_string(),
            })?;

        let members = self.members(id).await?;
        let items = ItemRepo::new(self.pool).for_list(id).await?;

        Ok(TodoList {
            id: summary.id,
            title: summary.title,
            items,
            members,
        })
    }

    /// Members of a list ordered by username.
    pub async fn members(&self, list_id: i64) -> Result<Vec<User>, DbError> {
        let members = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.created_at
            FROM todo_list_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.list_id = ?
            ORDER BY u.username
            "#,
        )
        .bind(list_id)
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    /// Create a list whose only member is `creator`.
    ///
    /// The list row and the membership row are written together or not at all.
    pub async fn create(&self, title: &ListTitle, creator: &User) -> Result<TodoList, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("INSERT INTO todo_lists (title) VALUES (?) RETURNING id")
            .bind(title.as_str())
            .fetch_one(&mut *tx)
            .await?;
        let id: i64 = row.try_get("id")?;

        sqlx::query("INSERT INTO todo_list_members (list_id, user_id) VALUES (?, ?)")
            .bind(id)
            .bind(creator.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(list_id = id, creator = %creator.username, "list created");

        Ok(TodoList {
            id,
            title: title.as_str().to_owned(),
            items: Vec::new(),
            members: vec![creator.clone()],
        })
    }

    /// Add a member. Returns `false` if the user already was one.
    pub async fn add_member(&self, list_id: i64, user_id: Uuid) -> Result<bool, DbError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO todo_list_members (list_id, user_id) VALUES (?, ?)")
                .bind(list_id)
                .bind(user_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
