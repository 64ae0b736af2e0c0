//! UI Components
//!
//! Leptos components rendered on the server.

mod layout;
mod item_form;
mod list_table;

pub use layout::Layout;
pub use item_form::{FormState, ItemForm};
pub use list_table::ListTable;
