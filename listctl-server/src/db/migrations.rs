//! Schema creation
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so this runs on every
//! startup.

use sqlx::SqlitePool;

use super::DbError;

/// Create all tables and indexes if absent
pub async fn run(pool: &SqlitePool) -> Result<(), DbError> {
    tracing::info!("Running listctl migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo_lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(title) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo_list_members (
            list_id INTEGER NOT NULL REFERENCES todo_lists(id) ON DELETE CASCADE,
            user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (list_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES todo_lists(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            deadline TEXT NOT NULL,
            flag TEXT NOT NULL CHECK (flag IN ('Active', 'Finished', 'Canceled')),
            created_by BLOB NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todo_items_list ON todo_items(list_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_todo_list_members_user ON todo_list_members(user_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("listctl migrations complete");
    Ok(())
}
