//! Domain layer: membership-gated list and item operations
//!
//! Every write follows the same shape: require a caller, load the
//! aggregate, check membership, mutate, persist. Reads are open to anyone
//! who knows an id.

pub mod items;
pub mod lists;

use crate::db::{DbError, TodoList, User};
use crate::models::ValidationError;

pub use items::{ItemInput, ItemService};
pub use lists::{ListService, MembershipChange};

/// Outcome of a rejected domain operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("{resource} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("user '{username}' is not a member of list {list_id}")]
    Forbidden { list_id: i64, username: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(DbError),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Db(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn require_caller(caller: Option<&User>) -> ServiceResult<&User> {
    caller.ok_or(ServiceError::Unauthenticated)
}

fn ensure_member(list: &TodoList, user: &User) -> ServiceResult<()> {
    if list.is_member(user) {
        return Ok(());
    }

    tracing::debug!(list_id = list.id, username = %user.username, "rejected non-member");
    Err(ServiceError::Forbidden {
        list_id: list.id,
        username: user.username.clone(),
    })
}
