//! Item Form Component
//!
//! The single-field form used both to start a list and to add to one.

use leptos::prelude::*;

use crate::ITEM_TEXT_FIELD;

/// State of the item form as it should be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Where the form posts to
    pub action: String,
    /// Value to pre-fill, kept when a submission is rejected
    pub value: String,
    /// Validation message attached to the text field
    pub error: Option<String>,
}

impl FormState {
    /// Blank form posting to `action`
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            value: String::new(),
            error: None,
        }
    }

    /// Rejected submission: keep what the user typed and show why
    pub fn with_error(
        action: impl Into<String>,
        value: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            value: value.into(),
            error: Some(error.into()),
        }
    }
}

#[component]
pub fn ItemForm(form: FormState) -> impl IntoView {
    let FormState {
        action,
        value,
        error,
    } = form;
    let group_class = if error.is_some() {
        "form-group has-error"
    } else {
        "form-group"
    };
    let value = (!value.is_empty()).then_some(value);

    view! {
        <form method="POST" action=action>
            <div class=group_class>
                <input
                    name=ITEM_TEXT_FIELD
                    id="id_text"
                    type="text"
                    placeholder="Enter a to-do item"
                    class="form-control input-lg"
                    autofocus=true
                    value=value
                />
                {error.map(|message| view! { <span class="help-block">{message}</span> })}
            </div>
        </form>
    }
}
