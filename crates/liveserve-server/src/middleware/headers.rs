//! Response header middleware.
//!
//! Adds headers to all responses:
//! - Cache-Control (the browser must always re-fetch, or edits would not show up)
//! - X-Content-Type-Options

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Cache-Control header value. A development server must never let the
/// browser serve a stale copy of a file that just changed on disk.
const CACHE_CONTROL: &str = "no-store";

/// Create layer that adds Cache-Control header.
pub(crate) fn no_cache_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static(CACHE_CONTROL),
    )
}

/// Create layer that adds X-Content-Type-Options header.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}
