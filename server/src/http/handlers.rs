//! List and item handlers
//!
//! Validation failures re-render the submitting page with the message
//! attached to the text field; successes redirect to the list page.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use superlists_ui::{home_page, list_page, FormState};

use super::response::{domain_error_response, html, not_found};
use crate::AppState;

pub const NEW_LIST_URL: &str = "/lists/new";

/// Body of the item form
#[derive(Debug, Deserialize)]
pub struct ItemSubmission {
    #[serde(default)]
    pub text: String,
}

/// `GET /`
pub async fn home() -> Response {
    html(StatusCode::OK, home_page(FormState::new(NEW_LIST_URL)))
}

/// `POST /lists/new`
pub async fn new_list(
    State(state): State<AppState>,
    Form(form): Form<ItemSubmission>,
) -> Response {
    match state.lists.start_new_list(&form.text).await {
        Ok(list) => Redirect::to(&list.url()).into_response(),
        Err(err) => match err.form_message() {
            Some(message) => html(
                StatusCode::OK,
                home_page(FormState::with_error(NEW_LIST_URL, form.text.clone(), message)),
            ),
            None => domain_error_response(err),
        },
    }
}

/// `GET /lists/{id}/`
pub async fn view_list(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Some(list_id) = parse_list_id(&raw_id) else {
        return not_found();
    };
    render_list(&state, list_id, FormState::new(list_url(list_id))).await
}

/// `POST /lists/{id}/` and `POST /lists/{id}/add_item`
pub async fn add_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<ItemSubmission>,
) -> Response {
    let Some(list_id) = parse_list_id(&raw_id) else {
        return not_found();
    };
    match state.lists.add_item(list_id, &form.text).await {
        Ok(_) => Redirect::to(&list_url(list_id)).into_response(),
        Err(err) => match err.form_message() {
            Some(message) => {
                let form = FormState::with_error(list_url(list_id), form.text.clone(), message);
                render_list(&state, list_id, form).await
            }
            None => domain_error_response(err),
        },
    }
}

/// `GET /lists/{id}/add_item` has no page of its own
pub async fn add_item_page(Path(raw_id): Path<String>) -> Response {
    match parse_list_id(&raw_id) {
        Some(list_id) => Redirect::to(&list_url(list_id)).into_response(),
        None => not_found(),
    }
}

/// `GET /healthz`
pub async fn healthz(State(state): State<AppState>) -> Response {
    if state.db.is_initialized().await {
        (StatusCode::OK, "ok").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "database unavailable").into_response()
    }
}

async fn render_list(state: &AppState, list_id: u32, form: FormState) -> Response {
    match state.lists.list_detail(list_id).await {
        Ok(detail) => html(StatusCode::OK, list_page(form, detail.texts())),
        Err(err) => domain_error_response(err),
    }
}

fn list_url(list_id: u32) -> String {
    format!("/lists/{}/", list_id)
}

fn parse_list_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
