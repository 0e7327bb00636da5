//! Static file serving.
//!
//! Serves files from the configured root directory. Directory paths resolve
//! to their `index.html`. HTML responses get the live reload client script
//! injected when live reload is enabled.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::live_reload::client;
use crate::state::AppState;

/// Create router for static file serving.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_file)
}

/// Serve a file from the root directory.
async fn serve_file(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let raw_path = req.uri().path();

    let Ok(decoded) = percent_decode_str(raw_path.trim_start_matches('/')).decode_utf8() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    // Reject anything that could escape the root directory
    let Some(relative) = sanitize_path(&decoded) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut file_path = state.root_dir.join(&relative);

    // Directory requests (including "/") resolve to their index file
    if is_dir(&file_path).await {
        file_path.push("index.html");
    }

    let Ok(content) = tokio::fs::read(&file_path).await else {
        if state.verbose {
            tracing::info!(path = raw_path, "Not found");
        }
        return StatusCode::NOT_FOUND.into_response();
    };

    if state.verbose {
        tracing::info!(path = raw_path, bytes = content.len(), "Serving file");
    }

    // HTML pages get the live reload client script injected
    if is_html(&file_path) {
        let html = String::from_utf8_lossy(&content);
        let body = if state.live_reload_enabled() {
            client::inject(&html)
        } else {
            html.into_owned()
        };
        return html_response(body);
    }

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(content))
    {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Build a 200 response with an HTML body.
fn html_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Check whether a path is an existing directory.
async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_dir())
}

/// Check whether a path serves as HTML based on its extension.
fn is_html(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Normalize a decoded request path into a relative path under the root.
///
/// Only plain path components are accepted. `..`, absolute paths, and drive
/// prefixes return `None` so the server cannot read outside the root
/// directory. An empty path (the site root) maps to an empty relative path.
fn sanitize_path(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();

    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(relative)
}
