//! Full pages served by the backend.
//!
//! Each page is a `Layout` view rendered to a complete HTML document.

use leptos::prelude::*;
use leptos::reactive::owner::Owner;

use crate::components::{FormState, ItemForm, Layout, ListTable};

/// Render a view to a string inside its own reactive owner
fn render<F, V>(build: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView,
{
    let owner = Owner::new();
    owner.with(|| build().into_view().to_html())
}

/// Landing page with the form that starts a new list
pub fn home_page(form: FormState) -> String {
    render(move || {
        view! {
            <Layout header="Start a new To-Do list">
                <ItemForm form=form/>
            </Layout>
        }
    })
}

/// A list's page: the add-item form followed by its items
pub fn list_page(form: FormState, items: Vec<String>) -> String {
    render(move || {
        view! {
            <Layout header="Your To-Do list">
                <ItemForm form=form/>
                <ListTable items=items/>
            </Layout>
        }
    })
}

pub fn not_found_page() -> String {
    render(|| {
        view! {
            <Layout header="Not Found">
                <p>"The requested list does not exist."</p>
                <p><a href="/">"Start a new list"</a></p>
            </Layout>
        }
    })
}

pub fn bad_request_page() -> String {
    render(|| view! { <Layout header="Bad Request (400)">{()}</Layout> })
}

pub fn server_error_page() -> String {
    render(|| view! { <Layout header="Server Error (500)">{()}</Layout> })
}
