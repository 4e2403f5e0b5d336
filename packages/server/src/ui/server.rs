//! Server execution logic.

use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::{
    domain::HistoryError,
    infrastructure::{history::FileHistoryStore, transport::Transport},
    usecase::{ChatSession, SessionError},
};

use super::{config::ServerConfig, handler::open_connection, signal::shutdown_signal};

/// Process-fatal server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Cannot listen at all
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Cannot create the history file
    #[error(transparent)]
    History(#[from] HistoryError),

    /// The operator console could not join its own session
    #[error("Console could not join: {0}")]
    Console(#[source] SessionError),

    /// The session became unusable while serving
    #[error("Session failed: {0}")]
    Session(#[source] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// TCP chat relay server
///
/// Owns the listener and the session; one server is one session.
///
/// # Example
///
/// ```ignore
/// let server = Server::bind(&ServerConfig::default()).await?;
/// server.run().await?;
/// ```
pub struct Server {
    listener: TcpListener,
    session: Arc<ChatSession>,
    history_path: Option<PathBuf>,
    local_addr: SocketAddr,
    console: bool,
}

impl Server {
    /// Bind the listener and create the session's history file.
    ///
    /// The history file name is derived from the port actually bound, so
    /// `port = 0` still yields a deterministic `history-<port>.txt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the history file
    /// cannot be created.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let history = FileHistoryStore::create(&config.history_dir, local_addr.port()).await?;
        let history_path = history.path().to_path_buf();

        let mut server = Self::with_session(
            listener,
            ChatSession::new(Box::new(history)),
            config.console,
        )?;
        server.history_path = Some(history_path);
        Ok(server)
    }

    /// Serve an already bound listener with a session built by the caller.
    pub fn with_session(
        listener: TcpListener,
        session: ChatSession,
        console: bool,
    ) -> Result<Self, ServerError> {
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            session: Arc::new(session),
            history_path: None,
            local_addr,
            console,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Path of the history file, when the session records to one.
    pub fn history_path(&self) -> Option<&std::path::Path> {
        self.history_path.as_deref()
    }

    pub fn session(&self) -> Arc<ChatSession> {
        self.session.clone()
    }

    /// Run until Ctrl+C / SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves or the session fails.
    ///
    /// With the console enabled, stdin/stdout joins as Connection 0 before
    /// the first peer is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Session`] when the session fails, so the
    /// process exits with an error instead of reporting a clean shutdown.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Listening on {}", self.local_addr);
        if let Some(path) = &self.history_path {
            tracing::info!("History is recorded to {}", path.display());
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        if self.console {
            let console = open_connection(self.session.clone(), Transport::stdio())
                .await
                .map_err(ServerError::Console)?;
            tokio::spawn(async move {
                let _ = console.run().await;
            });
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        tracing::debug!("Accepted connection from {}", addr);
                        let session = self.session.clone();
                        tokio::spawn(async move {
                            if let Ok(connection) = open_connection(session, Transport::tcp(stream)).await {
                                let _ = connection.run().await;
                            }
                        });
                    }
                    Err(e) => tracing::warn!("Failed to accept connection: {}", e),
                },
                _ = &mut shutdown => break,
                error = self.session.wait_failed() => {
                    tracing::error!("History is unavailable, closing the session");
                    return Err(ServerError::Session(error));
                }
            }
        }

        tracing::info!("Closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::MockHistoryStore, usecase::MAX_CONSECUTIVE_HISTORY_FAILURES};

    #[tokio::test]
    async fn test_bind_creates_history_file_for_bound_port() {
        // テスト項目: 実際に割り当てられたポート番号で履歴ファイルが作成される
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 0,
            history_dir: dir.path().to_path_buf(),
            console: false,
        };

        // when (操作):
        let server = Server::bind(&config).await.unwrap();

        // then (期待する結果):
        let port = server.local_addr().port();
        assert_ne!(port, 0);
        let history_path = server.history_path().unwrap();
        assert_eq!(
            history_path,
            dir.path().join(format!("history-{}.txt", port))
        );
        assert!(history_path.exists());
    }

    #[tokio::test]
    async fn test_bind_fails_when_history_dir_is_missing() {
        // テスト項目: 履歴ファイルを作成できない場合は起動に失敗する
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 0,
            history_dir: dir.path().join("missing"),
            console: false,
        };

        let result = Server::bind(&config).await;

        assert!(matches!(result, Err(ServerError::History(_))));
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_is_taken() {
        // テスト項目: 使用中のポートには bind できない
        let dir = tempfile::tempdir().unwrap();
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            history_dir: dir.path().to_path_buf(),
            console: false,
        };

        let result = Server::bind(&config).await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_session_failure_stops_server_with_error() {
        // テスト項目: 履歴が使えなくなるとサーバーはエラーを返して停止する
        // given (前提条件): 追記が常に失敗する履歴ストア
        let mut history = MockHistoryStore::new();
        history.expect_replay().returning(|_| Ok(0));
        history
            .expect_append()
            .returning(|_| Err(HistoryError::Append(std::io::Error::other("disk full"))));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server =
            Server::with_session(listener, ChatSession::new(Box::new(history)), false).unwrap();
        let addr = server.local_addr();
        assert!(server.history_path().is_none());
        let running = tokio::spawn(server.run_until(std::future::pending()));

        // when (操作): 参加通知の追記が 3 回連続で失敗する
        let mut peers = Vec::new();
        for _ in 0..MAX_CONSECUTIVE_HISTORY_FAILURES {
            peers.push(tokio::net::TcpStream::connect(addr).await.unwrap());
        }

        // then (期待する結果):
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), running)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(matches!(
            result,
            Err(ServerError::Session(SessionError::HistoryUnavailable { .. }))
        ));
    }
}
