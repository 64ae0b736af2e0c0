//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod list_repo;
mod item_repo;


pub use traits::Repository;
pub use db::{init_db, migrate, DbState, SharedConnection};
pub use list_repo::ListRepository;
pub use item_repo::ItemRepository;
