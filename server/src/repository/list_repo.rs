//! List Repository
//!
//! SQLite-backed persistence for lists.

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult, List};
use super::db::{not_initialized, SharedConnection};
use super::traits::Repository;

/// SQLite implementation of List repository
pub struct ListRepository {
    conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<List> for ListRepository {
    async fn create(&self, _entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("INSERT INTO lists DEFAULT VALUES", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(List::new(conn.last_insert_rowid() as u32))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id FROM lists WHERE id = ?")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut rows = stmt
            .query([id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next().map_err(|e| DomainError::Internal(e.to_string()))? {
            Some(row) => Ok(Some(List::new(
                row.get(0).map_err(|e| DomainError::Internal(e.to_string()))?,
            ))),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id FROM lists ORDER BY id")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, u32>(0))
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut lists = Vec::new();
        for id in ids {
            lists.push(List::new(id.map_err(|e| DomainError::Internal(e.to_string()))?));
        }
        Ok(lists)
    }
}
