//! File-backed history store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncReadExt, AsyncWriteExt},
};

use crate::domain::{HistoryError, HistoryStore, OutboundChannel};

use super::REPLAY_CHUNK_SIZE;

/// Path of the history file for the session listening on `port`.
pub fn history_path(dir: &Path, port: u16) -> PathBuf {
    dir.join(format!("history-{}.txt", port))
}

/// History log stored as the raw concatenation of every broadcast chunk.
///
/// The file is truncated when the store is created: one file per session.
pub struct FileHistoryStore {
    path: PathBuf,
    file: File,
}

impl FileHistoryStore {
    /// Create (or truncate) the history file for the session listening on `port`.
    pub async fn create(dir: &Path, port: u16) -> Result<Self, HistoryError> {
        let path = history_path(dir, port);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|source| HistoryError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("History file '{}' opened", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn append(&mut self, bytes: &[u8]) -> Result<(), HistoryError> {
        self.file
            .write_all(bytes)
            .await
            .map_err(HistoryError::Append)?;
        // tokio's File buffers writes internally; flush hands them to the OS
        // so a replay opened right after sees them.
        self.file.flush().await.map_err(HistoryError::Append)
    }

    async fn replay(&self, sink: &OutboundChannel) -> Result<u64, HistoryError> {
        let mut reader = File::open(&self.path)
            .await
            .map_err(HistoryError::Replay)?;
        let mut buf = vec![0u8; REPLAY_CHUNK_SIZE];
        let mut sent = 0u64;

        loop {
            let n = reader.read(&mut buf).await.map_err(HistoryError::Replay)?;
            if n == 0 {
                break;
            }
            sink.send(buf[..n].to_vec())
                .await
                .map_err(|_| HistoryError::SinkClosed)?;
            sent += n as u64;
        }

        Ok(sent)
    }
}
