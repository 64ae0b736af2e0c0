//! Static file handler
//!
//! Serves `/static/...` from the configured static root. Files the static
//! root lacks fall back to the assets bundled in `superlists_ui`.

use std::path::{Component, Path, PathBuf};

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::AppState;

const STATIC_PREFIX: &str = "/static/";

/// `GET /static/*path`
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(relative) = relative_asset_path(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = state.config.static_root.join(&relative);

    match tokio::fs::read(&path).await {
        Ok(content) => asset_response(&path, content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let key = relative.to_string_lossy().replace('\\', "/");
            match superlists_ui::assets::find(&key) {
                Some(bundled) => asset_response(&relative, bundled.as_bytes().to_vec()),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read static file");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn asset_response(path: &Path, content: Vec<u8>) -> Response {
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    (
        [(header::CONTENT_TYPE, mime_type.as_ref().to_string())],
        content,
    )
        .into_response()
}

/// Decode the request path below `/static/`, refusing anything that could
/// escape the static root
fn relative_asset_path(request_path: &str) -> Option<PathBuf> {
    let encoded = request_path.strip_prefix(STATIC_PREFIX)?;
    let decoded = percent_decode_str(encoded).decode_utf8().ok()?;

    let relative = PathBuf::from(decoded.as_ref());
    if relative.as_os_str().is_empty() {
        return None;
    }
    if relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Some(relative)
    } else {
        None
    }
}
