//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use tokio::sync::broadcast;

use crate::live_reload::{LiveReloadManager, ReloadEvent};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Directory served over HTTP.
    pub(crate) root_dir: PathBuf,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
    /// Enable verbose output (per-request logging).
    pub(crate) verbose: bool,
}

impl AppState {
    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }

    /// Subscribe to reload events, if live reload is enabled.
    pub(crate) fn subscribe_reload(&self) -> Option<broadcast::Receiver<ReloadEvent>> {
        self.live_reload.as_ref().map(LiveReloadManager::subscribe)
    }
}
