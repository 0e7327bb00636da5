//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::live_reload;
use crate::middleware::headers;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    // WebSocket for live reload
    if state.live_reload.is_some() {
        router = router.route("/ws/live-reload", get(live_reload::ws_handler));
    }

    // Static files from the root directory
    router = router.merge(static_files::static_router());

    // Add response header middleware
    router
        .layer(
            ServiceBuilder::new()
                .layer(headers::no_cache_layer())
                .layer(headers::content_type_options_layer()),
        )
        .with_state(state)
}
