//! Outbound pusher loop.
//!
//! The session never writes to a socket directly: it sends chunks into the
//! connection's bounded [`OutboundChannel`], and this loop writes them out in
//! order. When the write side fails the loop ends and drops its receiver, so
//! the session's next send to that connection fails and the connection is
//! removed.

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    task::JoinHandle,
};

use crate::domain::OutboundChannel;

/// Number of chunks a connection may have in flight before senders wait.
///
/// The session sends while holding its lock, so a peer that stays connected
/// but stops reading stalls fan-out, joins and leaves for everyone once this
/// many chunks plus its socket buffer are pending. That is the blocking
/// backpressure fan-out relies on; nothing is buffered beyond it.
pub const OUTBOUND_CAPACITY: usize = 64;

/// Spawns a task that receives chunks from the channel and writes them to `writer`.
///
/// # Returns
///
/// The sending half for the session, and a `JoinHandle` for the spawned task
pub fn spawn_pusher<W>(mut writer: W, label: String) -> (OutboundChannel, JoinHandle<()>)
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(OUTBOUND_CAPACITY);

    let handle = tokio::spawn(async move {
        while let Some(chunk) = rx.recv().await {
            let written = async {
                writer.write_all(&chunk).await?;
                writer.flush().await
            }
            .await;

            if let Err(e) = written {
                tracing::warn!("Failed to write to '{}': {}", label, e);
                return;
            }
        }

        // Every sender is gone: the connection left the session.
        if let Err(e) = writer.shutdown().await {
            tracing::debug!("Failed to shut down writer of '{}': {}", label, e);
        }
    });

    (tx, handle)
}
