//! Item Entity
//!
//! A single to-do entry. Items belong to exactly one list, are never edited
//! after creation, and are displayed in the order they were inserted.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// Shown when the submitted text is empty
pub const EMPTY_ITEM_ERROR: &str = "You can't have an empty list item";

/// Shown when the list already holds an item with the same text
pub const DUPLICATE_ITEM_ERROR: &str = "You've already got this in your list";

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier; also the display order within a list
    pub id: u32,
    /// Owning list
    pub list_id: u32,
    /// Item text content
    pub text: String,
}

impl Item {
    /// Create an item not yet persisted (id assigned by the database)
    pub fn new(list_id: u32, text: String) -> Self {
        Self { id: 0, list_id, text }
    }

    /// Normalize submitted text, rejecting empty input
    ///
    /// Surrounding whitespace is stripped before the emptiness check.
    pub fn clean_text(raw: &str) -> DomainResult<String> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidInput(EMPTY_ITEM_ERROR.to_string()));
        }
        Ok(text.to_string())
    }
}

impl Entity for Item {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
