//! Connection handlers.
//!
//! Lifecycle of one connection: `Joining` (history replay and announcement,
//! inside [`open_connection`]) → `Active` (the relay in
//! [`ActiveConnection::run`]) → `Closed` (removed from the session).

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    domain::Identity,
    infrastructure::{
        pusher::spawn_pusher,
        transport::{BoxedReader, Transport},
    },
    usecase::{ChatSession, RelayError, SessionError, relay},
};

/// A connection that has joined the session and is ready to relay.
pub struct ActiveConnection {
    session: Arc<ChatSession>,
    identity: Identity,
    reader: BoxedReader,
    label: String,
    pusher: JoinHandle<()>,
}

/// Join `transport` to the session.
///
/// Spawns the outbound pusher first so the history replay can stream to the
/// peer while the join is in progress.
pub async fn open_connection(
    session: Arc<ChatSession>,
    transport: Transport,
) -> Result<ActiveConnection, SessionError> {
    let (reader, writer, label) = transport.into_parts();
    let (outbound, pusher) = spawn_pusher(writer, label.clone());

    match session.join(outbound).await {
        Ok(identity) => {
            tracing::info!("'{}' joined as user {}", label, identity.id());
            Ok(ActiveConnection {
                session,
                identity,
                reader,
                label,
                pusher,
            })
        }
        Err(e) => {
            tracing::warn!("'{}' could not join: {}", label, e);
            Err(e)
        }
    }
}

impl ActiveConnection {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Relay inbound chunks until the stream ends, then leave the session.
    ///
    /// Returns the relay's error, if any, after the connection has been removed.
    pub async fn run(self) -> Result<(), RelayError> {
        let Self {
            session,
            identity,
            reader,
            label,
            pusher,
        } = self;

        let result = relay(&session, &identity, reader).await;
        match &result {
            Ok(chunks) => tracing::info!(
                "'{}' (user {}) closed after {} chunk(s)",
                label,
                identity.id(),
                chunks
            ),
            Err(e) => tracing::warn!("'{}' (user {}) failed: {}", label, identity.id(), e),
        }

        session.leave(identity.id()).await;
        // Removal dropped the last sender; the pusher flushes what is queued and exits.
        if let Err(e) = pusher.await {
            tracing::debug!("Pusher of '{}' ended abnormally: {}", label, e);
        }

        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use irori_shared::color::RESET;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        sync::Mutex,
    };

    use super::*;
    use crate::{domain::join_announcement, infrastructure::history::InMemoryHistoryStore};

    fn create_test_session() -> Arc<ChatSession> {
        let log = Arc::new(Mutex::new(Vec::new()));
        Arc::new(ChatSession::new(Box::new(InMemoryHistoryStore::new(log))))
    }

    #[tokio::test]
    async fn test_connections_exchange_chunks_over_duplex_streams() {
        // テスト項目: 2 つの接続間でチャンクが整形されて届き、切断後は登録から外れる
        // given (前提条件):
        let session = create_test_session();
        let (alice_local, mut alice_remote) = tokio::io::duplex(4096);
        let (bob_local, mut bob_remote) = tokio::io::duplex(4096);
        let (alice_read, alice_write) = tokio::io::split(alice_local);
        let (bob_read, bob_write) = tokio::io::split(bob_local);

        let alice = open_connection(
            session.clone(),
            Transport::new(alice_read, alice_write, "alice"),
        )
        .await
        .unwrap();
        let bob = open_connection(session.clone(), Transport::new(bob_read, bob_write, "bob"))
            .await
            .unwrap();
        let alice_identity = alice.identity().clone();
        let bob_identity = bob.identity().clone();
        let alice_task = tokio::spawn(alice.run());
        let bob_task = tokio::spawn(bob.run());

        // when (操作):
        alice_remote.write_all(b"hi").await.unwrap();

        // then (期待する結果): bob は alice の参加通知（履歴）と "hi" を受け取る
        let mut expected = join_announcement(&alice_identity);
        expected.extend(format!("{}hi{}", alice_identity.prefix(), RESET).into_bytes());
        let mut received = vec![0u8; expected.len()];
        bob_remote.read_exact(&mut received).await.unwrap();
        assert_eq!(received, expected);

        // alice は bob の参加通知を受け取る
        let announcement = join_announcement(&bob_identity);
        let mut received = vec![0u8; announcement.len()];
        alice_remote.read_exact(&mut received).await.unwrap();
        assert_eq!(received, announcement);

        // 切断すると登録から外れる
        drop(alice_remote);
        alice_task.await.unwrap().unwrap();
        assert_eq!(session.connection_ids().await, vec![bob_identity.id()]);

        drop(bob_remote);
        let _ = bob_task.await.unwrap();
        assert!(session.connection_ids().await.is_empty());
    }
}
