//! Server error types.

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid bind address.
    #[error("Invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    /// I/O error (e.g., the port is already in use).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watcher error.
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}
