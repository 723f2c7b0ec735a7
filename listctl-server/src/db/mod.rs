//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One explicit pool handle, opened at startup and passed to each component
//! - Repositories return fully loaded aggregates (no lazy per-field fetches)
//! - Rely on DB constraints for uniqueness, handle conflicts
//! - Transactions for multi-step writes

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;

use sqlx::SqlitePool;

pub use error::DbError;
pub use pool::{create_memory_pool, create_pool};
pub use repos::*;

/// Open the pool and make sure the schema exists.
///
/// Run once at process start; the returned handle is cloned into
/// whatever needs it.
pub async fn init(database_url: &str) -> Result<SqlitePool, DbError> {
    let pool = create_pool(database_url).await?;
    migrations::run(&pool).await?;
    Ok(pool)
}
