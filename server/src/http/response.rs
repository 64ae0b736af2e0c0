//! Shared response builders.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::DomainError;

pub(crate) fn html(status: StatusCode, body: String) -> Response {
    (status, Html(body)).into_response()
}

pub(crate) fn not_found() -> Response {
    html(StatusCode::NOT_FOUND, superlists_ui::not_found_page())
}

pub(crate) fn bad_request() -> Response {
    html(StatusCode::BAD_REQUEST, superlists_ui::bad_request_page())
}

/// Map a domain error that was not handled as a form error
pub(crate) fn domain_error_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound(_) => not_found(),
        other => {
            tracing::error!(error = %other, "request failed");
            html(StatusCode::INTERNAL_SERVER_ERROR, superlists_ui::server_error_page())
        }
    }
}
