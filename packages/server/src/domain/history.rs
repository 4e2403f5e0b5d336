//! History store interface.
//!
//! ドメイン層が必要とする履歴ログへのインターフェース。
//! 具体的な実装（ファイル、インメモリ）は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{connection::OutboundChannel, error::HistoryError};

/// Append-only, session-scoped log of every broadcast chunk.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Write `bytes` to the end of the log.
    ///
    /// Returns once the write is accepted; no fsync is implied.
    async fn append(&mut self, bytes: &[u8]) -> Result<(), HistoryError>;

    /// Send the whole log, from its start and in write order, to `sink`.
    ///
    /// This is a snapshot read: it stops at the current end of the log and
    /// never waits for future appends. Returns the number of bytes sent.
    async fn replay(&self, sink: &OutboundChannel) -> Result<u64, HistoryError>;
}
