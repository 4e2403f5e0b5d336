//! ドメイン層のエラー型

use std::{io, path::PathBuf};

use thiserror::Error;

/// History store errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The log file could not be created
    #[error("Failed to open history file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the end of the log failed
    #[error("Failed to append to history: {0}")]
    Append(#[source] io::Error),

    /// Reading the log back failed
    #[error("Failed to replay history: {0}")]
    Replay(#[source] io::Error),

    /// The replay target went away before the replay finished
    #[error("Replay target closed before history was delivered")]
    SinkClosed,
}

/// Connection registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Connection {0} is already registered")]
    DuplicateConnection(u64),
}
