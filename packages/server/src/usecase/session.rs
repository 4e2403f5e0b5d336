//! UseCase: チャットセッション
//!
//! 接続レジストリと履歴ストアを一つの排他区間（`Mutex<SessionState>`）で保持します。
//! 参加処理（ID 割り当て → 履歴再生 → 参加通知 → 登録）とブロードキャスト
//! （配信 → 履歴追記）はどちらもこの排他区間の中で完結するため、
//! 履歴は常に配信された内容と一致し、新規参加者への履歴再生と
//! ライブ配信が入れ替わることもありません。

use chrono::Utc;
use tokio::sync::{Mutex, watch};

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, HistoryStore, Identity, OutboundChannel,
    join_announcement,
};

use super::error::SessionError;

/// Consecutive failed history appends after which the session gives up.
pub const MAX_CONSECUTIVE_HISTORY_FAILURES: u32 = 3;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients the chunk was handed to
    pub delivered: usize,
    /// Recipients whose outbound side was gone; they are no longer registered
    pub dropped: usize,
}

struct SessionState {
    registry: ConnectionRegistry,
    history: Box<dyn HistoryStore>,
    /// Joins so far; the next join gets this value as its id
    joins: u64,
    history_failures: u32,
}

/// One listening session: the connection registry plus its history log.
pub struct ChatSession {
    state: Mutex<SessionState>,
    failed: watch::Sender<bool>,
}

impl ChatSession {
    pub fn new(history: Box<dyn HistoryStore>) -> Self {
        let (failed, _) = watch::channel(false);
        Self {
            state: Mutex::new(SessionState {
                registry: ConnectionRegistry::new(),
                history,
                joins: 0,
                history_failures: 0,
            }),
            failed,
        }
    }

    /// Join a new connection to the session.
    ///
    /// The newcomer first receives the whole history through `outbound`, then
    /// its join announcement is broadcast to everyone already present, and
    /// only then is it registered for live traffic.
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 参加成功（割り当てられた識別情報）
    /// * `Err(SessionError)` - 履歴の再生に失敗した、またはセッションが利用不能
    pub async fn join(&self, outbound: OutboundChannel) -> Result<Identity, SessionError> {
        let mut state = self.state.lock().await;
        self.ensure_available(&state)?;

        // 1. ID・色・アバターを割り当て
        let identity = Identity::allocate(state.joins);
        state.joins += 1;

        // 2. これまでの履歴を新規参加者に再生
        let replayed = state.history.replay(&outbound).await?;
        tracing::debug!(
            "Replayed {} bytes of history to user {}",
            replayed,
            identity.id()
        );

        // 3. 既存の参加者に参加を通知
        let announcement = join_announcement(&identity);
        match self.fan_out(&mut state, &announcement, None).await {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => tracing::warn!(
                "Join announcement of user {} was not recorded: {}",
                identity.id(),
                e
            ),
        }

        // 4. ライブ配信の対象として登録
        state
            .registry
            .insert(Connection::new(identity.clone(), outbound))?;
        tracing::info!(
            "User {} joined ({} connected)",
            identity.id(),
            state.registry.len()
        );

        Ok(identity)
    }

    /// Deliver `chunk` to every registered connection except `origin`, then append it to history.
    ///
    /// A recipient whose outbound side is gone is skipped and removed; the
    /// rest still receive the chunk.
    pub async fn broadcast(
        &self,
        chunk: &[u8],
        origin: Option<ConnectionId>,
    ) -> Result<BroadcastReport, SessionError> {
        let mut state = self.state.lock().await;
        self.ensure_available(&state)?;

        if let Some(id) = origin
            && !state.registry.contains(id)
        {
            return Err(SessionError::Closed(id));
        }

        self.fan_out(&mut state, chunk, origin).await
    }

    /// Remove a connection. Leaving is silent: nothing is broadcast.
    ///
    /// Returns `false` if the connection was already gone.
    pub async fn leave(&self, id: ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        match state.registry.remove(id) {
            Some(connection) => {
                let stayed = Utc::now() - connection.joined_at();
                tracing::info!(
                    "User {} left after {}s ({} connected)",
                    id,
                    stayed.num_seconds(),
                    state.registry.len()
                );
                true
            }
            None => false,
        }
    }

    /// Ids of the registered connections, in join order.
    pub async fn connection_ids(&self) -> Vec<ConnectionId> {
        self.state.lock().await.registry.ids()
    }

    /// Whether history failures made the session unusable.
    pub fn is_failed(&self) -> bool {
        *self.failed.borrow()
    }

    /// Resolves once the session becomes unusable, with the error that made it so.
    pub async fn wait_failed(&self) -> SessionError {
        let mut rx = self.failed.subscribe();
        // The sender lives as long as `self`, so this only returns on failure.
        let _ = rx.wait_for(|failed| *failed).await;
        SessionError::HistoryUnavailable {
            failures: MAX_CONSECUTIVE_HISTORY_FAILURES,
        }
    }

    fn ensure_available(&self, state: &SessionState) -> Result<(), SessionError> {
        if self.is_failed() {
            return Err(SessionError::HistoryUnavailable {
                failures: state.history_failures,
            });
        }
        Ok(())
    }

    async fn fan_out(
        &self,
        state: &mut SessionState,
        chunk: &[u8],
        origin: Option<ConnectionId>,
    ) -> Result<BroadcastReport, SessionError> {
        let mut report = BroadcastReport::default();
        let mut gone = Vec::new();

        for connection in state.registry.broadcast_targets(origin) {
            if connection.outbound().send(chunk.to_vec()).await.is_ok() {
                report.delivered += 1;
            } else {
                tracing::warn!(
                    "Failed to deliver to user {}, removing it",
                    connection.id()
                );
                gone.push(connection.id());
            }
        }

        for id in gone {
            if state.registry.remove(id).is_some() {
                report.dropped += 1;
            }
        }

        self.record(state, chunk).await?;
        Ok(report)
    }

    async fn record(&self, state: &mut SessionState, chunk: &[u8]) -> Result<(), SessionError> {
        match state.history.append(chunk).await {
            Ok(()) => {
                state.history_failures = 0;
                Ok(())
            }
            Err(e) => {
                state.history_failures += 1;
                tracing::error!(
                    "History append failed ({}/{}): {}",
                    state.history_failures,
                    MAX_CONSECUTIVE_HISTORY_FAILURES,
                    e
                );

                if state.history_failures >= MAX_CONSECUTIVE_HISTORY_FAILURES {
                    self.failed.send_replace(true);
                    return Err(SessionError::HistoryUnavailable {
                        failures: state.history_failures,
                    });
                }
                Err(e.into())
            }
        }
    }
}
