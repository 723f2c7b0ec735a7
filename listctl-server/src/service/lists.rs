//! List operations

use sqlx::SqlitePool;

use super::{ensure_member, require_caller, ServiceError, ServiceResult};
use crate::db::{ListRepo, ListSummary, TodoList, User};
use crate::identity::IdentityProvider;
use crate::models::ListTitle;

/// Result of a successful add-member call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    AlreadyMember,
}

pub struct ListService<'a> {
    pool: &'a SqlitePool,
    identity: &'a dyn IdentityProvider,
}

impl<'a> ListService<'a> {
    pub fn new(pool: &'a SqlitePool, identity: &'a dyn IdentityProvider) -> Self {
        Self { pool, identity }
    }

    /// Every list, id and title only. No authorization filter.
    pub async fn list_all(&self) -> ServiceResult<Vec<ListSummary>> {
        Ok(ListRepo::new(self.pool).list_summaries().await?)
    }

    /// A list with its items and members. No membership check.
    pub async fn get(&self, id: i64) -> ServiceResult<TodoList> {
        Ok(ListRepo::new(self.pool).get(id).await?)
    }

    /// Create a list with the caller as its only member.
    pub async fn create(&self, caller: Option<&User>, title: &str) -> ServiceResult<TodoList> {
        let caller = require_caller(caller)?;
        let title = ListTitle::new(title)?;

        Ok(ListRepo::new(self.pool).create(&title, caller).await?)
    }

    /// Add an existing user to a list the caller belongs to.
    ///
    /// Checks run in order: caller present, list exists, caller is a
    /// member, target user exists. Adding a current member is a no-op.
    pub async fn add_member(
        &self,
        caller: Option<&User>,
        list_id: i64,
        username: &str,
    ) -> ServiceResult<MembershipChange> {
        let caller = require_caller(caller)?;
        let repo = ListRepo::new(self.pool);
        let list = repo.get(list_id).await?;
        ensure_member(&list, caller)?;

        let target = self
            .identity
            .find_user_by_name(username)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "user",
                id: username.to_owned(),
            })?;

        if list.is_member(&target) {
            tracing::debug!(list_id, username = %target.username, "already a member");
            return Ok(MembershipChange::AlreadyMember);
        }

        let change = if repo.add_member(list_id, target.id).await? {
            tracing::info!(
                list_id,
                added = %target.username,
                by = %caller.username,
                "member added"
            );
            MembershipChange::Added
        } else {
            // Lost a race with a concurrent add of the same user
            MembershipChange::AlreadyMember
        };
        Ok(change)
    }
}
