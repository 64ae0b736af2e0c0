//! HTTP Layer
//!
//! Routes, handlers and middleware.

mod handlers;
mod middleware;
mod response;
mod static_files;

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;

use crate::AppState;

pub use handlers::{ItemSubmission, NEW_LIST_URL};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/healthz", get(handlers::healthz))
        .route("/lists/new", axum::routing::post(handlers::new_list))
        .route(
            "/lists/:list_id/",
            get(handlers::view_list).post(handlers::add_item),
        )
        .route(
            "/lists/:list_id/add_item",
            get(handlers::add_item_page).post(handlers::add_item),
        )
        .route("/static/*path", get(static_files::serve_static))
        .layer(from_fn_with_state(state.clone(), middleware::allowed_hosts_middleware))
        .layer(from_fn(middleware::request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
