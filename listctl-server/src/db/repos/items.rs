//! Item repository
//!
//! Items are always read together with their creator so callers never
//! need a second lookup to render `createdBy`.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::User;
use crate::db::DbError;
use crate::models::{ItemFlag, ItemText, ItemTitle};

/// Item record with its creator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub text: String,
    pub deadline: DateTime<Utc>,
    pub flag: ItemFlag,
    pub created_by: User,
}

/// Fields for a new item. The flag is not settable: new items are Active.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: ItemTitle,
    pub text: ItemText,
    pub deadline: DateTime<Utc>,
}

/// Replacement values for an existing item. The creator is not settable.
#[derive(Debug, Clone)]
pub struct ItemChanges {
    pub title: ItemTitle,
    pub text: ItemText,
    pub deadline: DateTime<Utc>,
    pub flag: ItemFlag,
}

const ITEM_SELECT: &str = r#"
    SELECT
        i.id, i.list_id, i.title, i.text, i.deadline, i.flag,
        u.id AS creator_id, u.username AS creator_username, u.created_at AS creator_created_at
    FROM todo_items i
    JOIN users u ON u.id = i.created_by
"#;

fn item_from_row(row: &SqliteRow) -> Result<TodoItem, DbError> {
    let flag: String = row.try_get("flag")?;
    let flag = ItemFlag::parse(&flag).map_err(|e| DbError::Corrupt(e.to_string()))?;

    Ok(TodoItem {
        id: row.try_get("id")?,
        list_id: row.try_get("list_id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        deadline: row.try_get("deadline")?,
        flag,
        created_by: User {
            id: row.try_get("creator_id")?,
            username: row.try_get("creator_username")?,
            created_at: row.try_get("creator_created_at")?,
        },
    })
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a single item by ID.
    pub async fn get(&self, id: i64) -> Result<TodoItem, DbError> {
        let sql = format!("{ITEM_SELECT} WHERE i.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "item",
                id: id.to_string(),
            })?;

        item_from_row(&row)
    }

    /// All items of a list in insertion order.
    pub async fn for_list(&self, list_id: i64) -> Result<Vec<TodoItem>, DbError> {
        let sql = format!("{ITEM_SELECT} WHERE i.list_id = ? ORDER BY i.id ASC");
        let rows = sqlx::query(&sql).bind(list_id).fetch_all(self.pool).await?;

        rows.iter().map(item_from_row).collect()
    }

    /// Append an item to a list. The flag is always stored as Active.
    pub async fn create(
        &self,
        list_id: i64,
        item: NewItem,
        creator: &User,
    ) -> Result<TodoItem, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO todo_items (list_id, title, text, deadline, flag, created_by)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(list_id)
        .bind(item.title.as_str())
        .bind(item.text.as_str())
        .bind(item.deadline)
        .bind(ItemFlag::Active.as_str())
        .bind(creator.id)
        .fetch_one(self.pool)
        .await?;

        let id: i64 = row.try_get("id")?;
        tracing::info!(item_id = id, list_id, created_by = %creator.username, "item created");

        self.get(id).await
    }

    /// Overwrite title, text, deadline and flag of an item.
    ///
    /// `created_by` and `list_id` are never touched.
    pub async fn update(&self, id: i64, changes: ItemChanges) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE todo_items
            SET title = ?, text = ?, deadline = ?, flag = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.title.as_str())
        .bind(changes.text.as_str())
        .bind(changes.deadline)
        .bind(changes.flag.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "item",
                id: id.to_string(),
            });
        }

        tracing::info!(item_id = id, flag = %changes.flag, "item updated");
        Ok(())
    }

    /// ID of the list owning an item.
    pub async fn owning_list(&self, item_id: i64) -> Result<i64, DbError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT list_id FROM todo_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(|(list_id,)| list_id).ok_or_else(|| DbError::NotFound {
            resource: "item",
            id: item_id.to_string(),
        })
    }
}
