//! Item Repository
//!
//! SQLite-backed persistence for items. The `(list_id, text)` unique index
//! turns duplicate submissions into `DomainError::Conflict`.

use async_trait::async_trait;
use rusqlite::{params, Row};

use crate::domain::{DomainError, DomainResult, Item, List};
use super::db::{map_insert_error, not_initialized, SharedConnection};
use super::traits::Repository;

/// SQLite implementation of Item repository
pub struct ItemRepository {
    conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Items of one list in insertion order
    pub async fn list_for_list(&self, list_id: u32) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, list_id, text FROM items WHERE list_id = ? ORDER BY id ASC")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([list_id], row_to_item)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(items)
    }

    /// Create a list together with its first item, atomically
    ///
    /// `text` must already be cleaned; nothing is written if the insert fails.
    pub async fn create_list_with_item(&self, text: &str) -> DomainResult<(List, Item)> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tx.execute("INSERT INTO lists DEFAULT VALUES", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let list = List::new(tx.last_insert_rowid() as u32);

        tx.execute(
            "INSERT INTO items (list_id, text) VALUES (?, ?)",
            params![list.id, text],
        )
        .map_err(map_insert_error)?;
        let item = Item {
            id: tx.last_insert_rowid() as u32,
            list_id: list.id,
            text: text.to_string(),
        };

        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok((list, item))
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO items (list_id, text) VALUES (?, ?)",
            params![entity.list_id, entity.text],
        )
        .map_err(map_insert_error)?;

        let mut item = entity.clone();
        item.id = conn.last_insert_rowid() as u32;
        Ok(item)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, list_id, text FROM items WHERE id = ?")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut rows = stmt
            .query([id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next().map_err(|e| DomainError::Internal(e.to_string()))? {
            Some(row) => Ok(Some(
                row_to_item(row).map_err(|e| DomainError::Internal(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, list_id, text FROM items ORDER BY id ASC")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_item)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(items)
    }
}

/// Convert a database row to Item
fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        list_id: row.get(1)?,
        text: row.get(2)?,
    })
}
