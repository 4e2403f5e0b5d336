//! Peer session: pipes the local terminal to a running chat session.

use std::{future::Future, io};

use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    task::JoinError,
};

use crate::error::ClientError;

/// Sent to the session when the peer is interrupted.
pub const DISCONNECT_NOTICE: &[u8] = b"Disconnected!\n";

/// How a peer session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerExit {
    /// Local input reached EOF
    InputClosed,
    /// The session closed the connection
    ServerClosed,
    /// Interrupted by the shutdown signal
    Interrupted,
}

enum Outcome {
    InputClosed(io::Result<u64>),
    ServerClosed(Result<io::Result<u64>, JoinError>),
    Interrupted,
}

/// Connect to the session at `host:port`.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, ClientError> {
    let addr = format!("{}:{}", host, port);
    tracing::info!("Connecting to {}", addr);

    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect { addr, source })?;

    tracing::info!("Connected");
    Ok(stream)
}

/// Pipe `input` to the session and the session to `output`.
///
/// Runs until local input ends, the session closes the connection, or
/// `shutdown` resolves. On shutdown the peer sends [`DISCONNECT_NOTICE`]
/// before closing.
pub async fn run_peer<I, O, S>(
    mut input: I,
    mut output: O,
    stream: TcpStream,
    shutdown: S,
) -> Result<PeerExit, ClientError>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Send + Unpin + 'static,
    S: Future<Output = ()>,
{
    let (mut reader, mut writer) = stream.into_split();
    let mut inbound = tokio::spawn(async move {
        let copied = tokio::io::copy(&mut reader, &mut output).await;
        let _ = output.flush().await;
        copied
    });

    let outcome = tokio::select! {
        sent = tokio::io::copy(&mut input, &mut writer) => Outcome::InputClosed(sent),
        received = &mut inbound => Outcome::ServerClosed(received),
        _ = shutdown => Outcome::Interrupted,
    };

    let exit = match outcome {
        Outcome::InputClosed(sent) => {
            sent?;
            PeerExit::InputClosed
        }
        Outcome::ServerClosed(received) => {
            match received {
                Ok(copied) => {
                    copied?;
                }
                Err(e) => tracing::warn!("Inbound task ended abnormally: {}", e),
            }
            return Ok(PeerExit::ServerClosed);
        }
        Outcome::Interrupted => {
            writer.write_all(DISCONNECT_NOTICE).await?;
            PeerExit::Interrupted
        }
    };

    writer.shutdown().await?;
    if exit == PeerExit::InputClosed {
        // Keep printing until the session closes our side.
        match inbound.await {
            Ok(copied) => {
                copied?;
            }
            Err(e) => tracing::warn!("Inbound task ended abnormally: {}", e),
        }
    } else {
        inbound.abort();
    }

    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{io::AsyncReadExt, net::TcpListener};

    async fn create_test_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (client, server) = tokio::join!(TcpStream::connect(addr), listener.accept());
        (client.unwrap(), server.unwrap().0)
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // テスト項目: 誰も待ち受けていないアドレスへの接続は Connect エラーになる
        // given (前提条件): 一度 bind してすぐ閉じたポート
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        // when (操作):
        let result = connect("127.0.0.1", port).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_input_is_sent_and_session_output_is_printed() {
        // テスト項目: 入力がサーバーに送られ、サーバーからの受信内容が出力される
        // given (前提条件):
        let (client, mut server) = create_test_pair().await;
        let (output, mut screen) = tokio::io::duplex(1024);

        // when (操作):
        let peer = tokio::spawn(run_peer(
            &b"hello\n"[..],
            output,
            client,
            std::future::pending(),
        ));
        let mut sent = vec![0u8; 6];
        server.read_exact(&mut sent).await.unwrap();
        server.write_all(b"welcome").await.unwrap();
        drop(server);

        // then (期待する結果):
        assert_eq!(sent, b"hello\n");
        assert_eq!(peer.await.unwrap().unwrap(), PeerExit::InputClosed);
        let mut printed = Vec::new();
        screen.read_to_end(&mut printed).await.unwrap();
        assert_eq!(printed, b"welcome");
    }

    #[tokio::test]
    async fn test_shutdown_sends_disconnect_notice() {
        // テスト項目: 中断時に "Disconnected!" を送ってから切断する
        // given (前提条件):
        let (client, mut server) = create_test_pair().await;
        let (input, _keyboard) = tokio::io::duplex(64);
        let (output, _screen) = tokio::io::duplex(64);

        // when (操作):
        let exit = run_peer(input, output, client, async {}).await.unwrap();

        // then (期待する結果):
        assert_eq!(exit, PeerExit::Interrupted);
        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, DISCONNECT_NOTICE);
    }

    #[tokio::test]
    async fn test_server_close_ends_session() {
        // テスト項目: サーバーが切断するとセッションが終了する
        // given (前提条件):
        let (client, server) = create_test_pair().await;
        let (input, _keyboard) = tokio::io::duplex(64);
        let (output, _screen) = tokio::io::duplex(64);
        drop(server);

        // when (操作):
        let exit = run_peer(input, output, client, std::future::pending())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(exit, PeerExit::ServerClosed);
    }
}
