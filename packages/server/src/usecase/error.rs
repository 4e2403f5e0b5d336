//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ConnectionId, HistoryError, RegistryError};

/// Chat session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// A single history operation failed; the session keeps running
    #[error(transparent)]
    History(#[from] HistoryError),

    /// History kept failing; the session no longer accepts traffic
    #[error("History unavailable after {failures} consecutive failures")]
    HistoryUnavailable { failures: u32 },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The connection is no longer part of the session
    #[error("Connection {0} is closed")]
    Closed(ConnectionId),
}

impl SessionError {
    /// Whether the session as a whole is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::HistoryUnavailable { .. })
    }
}

/// Per-connection relay errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// Reading from the connection's inbound stream failed
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}
