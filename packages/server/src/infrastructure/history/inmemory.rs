//! InMemory history store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{HistoryError, HistoryStore, OutboundChannel};

use super::REPLAY_CHUNK_SIZE;

/// History log kept in a shared byte buffer.
///
/// The buffer is shared so that the owner of the session can inspect it.
pub struct InMemoryHistoryStore {
    log: Arc<Mutex<Vec<u8>>>,
}

impl InMemoryHistoryStore {
    pub fn new(log: Arc<Mutex<Vec<u8>>>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&mut self, bytes: &[u8]) -> Result<(), HistoryError> {
        self.log.lock().await.extend_from_slice(bytes);
        Ok(())
    }

    async fn replay(&self, sink: &OutboundChannel) -> Result<u64, HistoryError> {
        let snapshot = self.log.lock().await.clone();
        for chunk in snapshot.chunks(REPLAY_CHUNK_SIZE) {
            sink.send(chunk.to_vec())
                .await
                .map_err(|_| HistoryError::SinkClosed)?;
        }
        Ok(snapshot.len() as u64)
    }
}
