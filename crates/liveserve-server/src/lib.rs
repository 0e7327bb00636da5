//! HTTP static file server with live reload.
//!
//! This crate provides a native Rust development server using axum, serving:
//! - Static files from a configured root directory
//! - WebSocket endpoint for live reload during development
//!
//! Served HTML pages get a small client script injected that connects to the
//! WebSocket endpoint and reloads the page whenever a file under the root
//! directory changes.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use liveserve_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 3001,
//!         root_dir: PathBuf::from("."),
//!         live_reload_enabled: true,
//!         watch_patterns: vec!["**/*".to_string()],
//!         debounce_ms: 100,
//!         verbose: false,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► Rust axum server (liveserve-server)
//!                        │
//!                        ├─► Static files (disk, with HTML script injection)
//!                        │
//!                        └─► WebSocket (Rust LiveReloadManager)
//!                                │
//!                                └─► notify (recursive filesystem watcher)
//! ```

mod app;
mod error;
mod live_reload;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::broadcast;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served over HTTP and watched for changes.
    pub root_dir: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload, relative to the root directory.
    pub watch_patterns: Vec<String>,
    /// Debounce window for coalescing filesystem events, in milliseconds.
    pub debounce_ms: u64,
    /// Enable verbose output.
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            root_dir: PathBuf::from("."),
            live_reload_enabled: true,
            watch_patterns: vec!["**/*".to_string()],
            debounce_ms: 100,
            verbose: false,
        }
    }
}

/// Build the application router and start the file watcher.
///
/// Exposed separately from [`run_server`] so the router can be exercised
/// without binding a socket. Must be called from within a tokio runtime when
/// live reload is enabled, since the watcher spawns background tasks.
///
/// # Errors
///
/// Returns an error if the file watcher cannot be created.
pub fn build_app(config: &ServerConfig) -> Result<axum::Router, ServerError> {
    // Create live reload manager if enabled
    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(
            config.root_dir.clone(),
            config.watch_patterns.clone(),
            config.debounce_ms,
            tx,
        );
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    // Create app state
    let state = Arc::new(AppState {
        root_dir: config.root_dir.clone(),
        live_reload,
        verbose: config.verbose,
    });

    Ok(app::create_router(state))
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the bind address is invalid, the port is already in
/// use, or the file watcher cannot be created.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let app = build_app(&config)?;

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, root = %config.root_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from liveserve config.
///
/// # Arguments
///
/// * `config` - liveserve configuration
/// * `verbose` - Enable verbose output
#[must_use]
pub fn server_config_from_config(config: &liveserve_config::Config, verbose: bool) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: config.site_resolved.root_dir.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_patterns: config.live_reload.watch_patterns.clone(),
        debounce_ms: config.live_reload.debounce_ms,
        verbose,
    }
}
