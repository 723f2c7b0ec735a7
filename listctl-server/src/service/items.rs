//! Item operations

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::{ensure_member, require_caller, ServiceResult};
use crate::db::{ItemChanges, ItemRepo, ListRepo, NewItem, TodoItem, User};
use crate::models::{ItemFlag, ItemText, ItemTitle};

/// Caller-supplied item fields, validated by the service
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub title: String,
    pub text: String,
    pub deadline: DateTime<Utc>,
}

pub struct ItemService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// A single item with its creator. No membership check.
    pub async fn get(&self, id: i64) -> ServiceResult<TodoItem> {
        Ok(ItemRepo::new(self.pool).get(id).await?)
    }

    /// Append a new Active item created by the caller to a list they belong to.
    pub async fn create(
        &self,
        caller: Option<&User>,
        list_id: i64,
        input: ItemInput,
    ) -> ServiceResult<TodoItem> {
        let caller = require_caller(caller)?;
        let list = ListRepo::new(self.pool).get(list_id).await?;
        ensure_member(&list, caller)?;

        let item = NewItem {
            title: ItemTitle::new(&input.title)?,
            text: ItemText::new(&input.text)?,
            deadline: input.deadline,
        };
        Ok(ItemRepo::new(self.pool).create(list.id, item, caller).await?)
    }

    /// Replace title, text, deadline and flag of an item.
    ///
    /// Membership is checked against the list owning the item. The creator
    /// stays whoever created the item. A missing flag means `Active`.
    pub async fn update(
        &self,
        caller: Option<&User>,
        item_id: i64,
        input: ItemInput,
        flag: Option<&str>,
    ) -> ServiceResult<()> {
        let caller = require_caller(caller)?;
        let items = ItemRepo::new(self.pool);
        let list_id = items.owning_list(item_id).await?;
        let list = ListRepo::new(self.pool).get(list_id).await?;
        ensure_member(&list, caller)?;

        let changes = ItemChanges {
            title: ItemTitle::new(&input.title)?,
            text: ItemText::new(&input.text)?,
            deadline: input.deadline,
            flag: flag.map(ItemFlag::parse).transpose()?.unwrap_or_default(),
        };
        items.update(item_id, changes).await?;
        Ok(())
    }
}
