//! Superlists Pages
//!
//! Leptos components for the to-do list application, rendered to HTML on
//! the server. The backend calls into `pages` and serves `assets` under
//! `/static/`.

mod components;
mod pages;
pub mod assets;

pub use components::{FormState, ItemForm, Layout, ListTable};
pub use pages::{bad_request_page, home_page, list_page, not_found_page, server_error_page};

/// Form field name the item text is submitted under
pub const ITEM_TEXT_FIELD: &str = "text";

/// Id of the table that lists a list's items
pub const LIST_TABLE_ID: &str = "id_list_table";
