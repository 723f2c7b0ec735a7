//! Storage error type

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("already exists: {resource} '{id}'")]
    Conflict { resource: &'static str, id: String },

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Map a unique-constraint violation to `Conflict`, pass everything else through.
    pub(crate) fn conflict_or(e: sqlx::Error, resource: &'static str, id: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                resource,
                id: id.to_owned(),
            },
            _ => Self::Sqlx(e),
        }
    }
}
