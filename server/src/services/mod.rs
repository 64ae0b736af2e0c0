//! Service Layer
//!
//! Business rules sitting between the HTTP handlers and the repositories.

mod list_service;

pub use list_service::{ListDetail, ListService};
