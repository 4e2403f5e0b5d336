//! UseCase: 接続ごとの中継パイプライン
//!
//! `read chunk → format(chunk, identity) → broadcast(formatted, origin)` を
//! 受信したチャンクごとに一度ずつ実行します。ブロードキャストが完了するまで
//! 次の読み込みは行わないため、配信側が詰まると読み込みも止まります。

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::domain::{ChunkFormatter, Identity};

use super::{
    error::{RelayError, SessionError},
    session::ChatSession,
};

/// Upper bound on the size of one inbound chunk.
pub const READ_BUFFER_SIZE: usize = 4096;

/// Relay every chunk read from `reader` to the rest of the session.
///
/// Runs until the inbound stream ends (returns the number of relayed chunks)
/// or fails. A chunk that was delivered but could not be written to history
/// is logged and the relay keeps going.
pub async fn relay<R>(
    session: &ChatSession,
    identity: &Identity,
    mut reader: R,
) -> Result<u64, RelayError>
where
    R: AsyncRead + Unpin,
{
    let formatter = ChunkFormatter::new(identity);
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut relayed = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(relayed);
        }

        let formatted = formatter.format(&buf[..n]);
        match session.broadcast(&formatted, Some(identity.id())).await {
            Ok(report) => tracing::debug!(
                "Relayed {} bytes from user {} to {} connection(s)",
                n,
                identity.id(),
                report.delivered
            ),
            Err(SessionError::History(e)) => tracing::warn!(
                "Chunk from user {} was delivered but not recorded: {}",
                identity.id(),
                e
            ),
            Err(e) => return Err(e.into()),
        }
        relayed += 1;
    }
}
