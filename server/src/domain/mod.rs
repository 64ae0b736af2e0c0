//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod entity;
mod item;
mod list;

pub use entity::{Entity, DomainError, DomainResult};
pub use item::{Item, EMPTY_ITEM_ERROR, DUPLICATE_ITEM_ERROR};
pub use list::List;
