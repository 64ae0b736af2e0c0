//! List Table Component

use leptos::prelude::*;

use crate::LIST_TABLE_ID;

/// Items of one list in insertion order, one row each, numbered from 1
#[component]
pub fn ListTable(items: Vec<String>) -> impl IntoView {
    view! {
        <table id=LIST_TABLE_ID class="table">
            {items
                .into_iter()
                .enumerate()
                .map(|(index, text)| {
                    let row = format!("{}: {}", index + 1, text);
                    view! { <tr><td>{row}</td></tr> }
                })
                .collect_view()}
        </table>
    }
}
