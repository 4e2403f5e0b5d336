//! Error types for the chat peer.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// No session is reachable at the address
    #[error("Cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection failed mid-session
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),
}
