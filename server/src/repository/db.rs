//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::{ffi, Connection};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, DUPLICATE_ITEM_ERROR};

/// Shared handle to the single SQLite connection
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle for repositories to share
    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Open (creating if needed) the database at `db_path` and migrate it
///
/// `:memory:` gives a private in-memory database, used by tests.
pub fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = open_connection(db_path)?;
    run_migrations(&conn)?;

    Ok(DbState {
        conn: Arc::new(Mutex::new(Some(conn))),
    })
}

/// Bring the schema at `db_path` up to date without keeping the connection
pub fn migrate(db_path: &Path) -> DomainResult<()> {
    let conn = open_connection(db_path)?;
    run_migrations(&conn)
}

fn open_connection(db_path: &Path) -> DomainResult<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::Internal(format!("Failed to create database dir: {}", e))
            })?;
        }
    }
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(conn)
}

/// Check if an index exists
fn index_exists(conn: &Connection, name: &str) -> DomainResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(count > 0)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            text TEXT NOT NULL DEFAULT ''
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_list ON items(list_id)",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Per-list uniqueness of item text
    if !index_exists(conn, "idx_items_list_text")? {
        conn.execute(
            "CREATE UNIQUE INDEX idx_items_list_text ON items(list_id, text)",
            [],
        )
        .map_err(|e| DomainError::Internal(format!("Failed to add item uniqueness: {}", e)))?;
    }

    Ok(())
}

/// Translate an insert failure into the domain error it stands for
pub(crate) fn map_insert_error(e: rusqlite::Error) -> DomainError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        match err.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return DomainError::Conflict(DUPLICATE_ITEM_ERROR.to_string());
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return DomainError::NotFound("List not found".to_string());
            }
            _ => {}
        }
    }
    DomainError::Internal(e.to_string())
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}
