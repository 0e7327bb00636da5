//! Live reload.
//!
//! Watches the root directory for filesystem changes and pushes reload
//! events to connected browsers over a WebSocket.

pub(crate) mod client;
mod debouncer;
mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::ws_handler;
