//! List Service
//!
//! Validation and persistence for starting lists and adding items to them.

use crate::domain::{DomainError, DomainResult, Item, List};
use crate::repository::{DbState, ItemRepository, ListRepository, Repository};

/// A list together with its items in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail {
    pub list: List,
    pub items: Vec<Item>,
}

impl ListDetail {
    /// Item texts in display order
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }
}

pub struct ListService {
    lists: ListRepository,
    items: ItemRepository,
}

impl ListService {
    pub fn new(db: &DbState) -> Self {
        Self {
            lists: ListRepository::new(db.connection()),
            items: ItemRepository::new(db.connection()),
        }
    }

    /// Start a new list whose first item is `raw_text`
    ///
    /// Empty text is rejected before any row is written.
    pub async fn start_new_list(&self, raw_text: &str) -> DomainResult<List> {
        let text = Item::clean_text(raw_text)?;
        let (list, item) = self.items.create_list_with_item(&text).await?;
        tracing::info!(list_id = list.id, item_id = item.id, "started new list");
        Ok(list)
    }

    /// Append `raw_text` to an existing list
    pub async fn add_item(&self, list_id: u32, raw_text: &str) -> DomainResult<Item> {
        let list = self.require_list(list_id).await?;
        let text = Item::clean_text(raw_text)?;
        let item = self.items.create(&Item::new(list.id, text)).await?;
        tracing::info!(list_id = list.id, item_id = item.id, "added item");
        Ok(item)
    }

    /// The list and its items, oldest first
    pub async fn list_detail(&self, list_id: u32) -> DomainResult<ListDetail> {
        let list = self.require_list(list_id).await?;
        let items = self.items.list_for_list(list.id).await?;
        Ok(ListDetail { list, items })
    }

    async fn require_list(&self, list_id: u32) -> DomainResult<List> {
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("List {} not found", list_id)))
    }
}
