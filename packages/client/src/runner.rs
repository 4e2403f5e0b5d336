//! Peer execution logic with fallback to hosting.

use std::path::PathBuf;

use irori_server::ui::{Server, ServerConfig, shutdown_signal};

use crate::session::{PeerExit, connect, run_peer};

/// Settings for one `irori` run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host of the session to join
    pub host: String,
    /// Port of the session to join, and to host on when joining fails
    pub port: u16,
    /// Address to listen on when hosting
    pub bind: String,
    /// Where the history file goes when hosting
    pub history_dir: PathBuf,
}

impl ClientConfig {
    /// Server settings used when no session is reachable.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind.clone(),
            port: self.port,
            history_dir: self.history_dir.clone(),
            console: true,
        }
    }
}

/// Join the session at `host:port`, or host one there if none is reachable.
pub async fn run(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match connect(&config.host, config.port).await {
        Ok(stream) => {
            let exit = run_peer(
                tokio::io::stdin(),
                tokio::io::stdout(),
                stream,
                shutdown_signal(),
            )
            .await?;

            match exit {
                PeerExit::InputClosed => tracing::info!("Input closed, left the session"),
                PeerExit::ServerClosed => tracing::info!("Session closed by host"),
                PeerExit::Interrupted => tracing::info!("Disconnected"),
            }
        }
        Err(e) => {
            tracing::warn!("{}; hosting a new session instead", e);
            let server = Server::bind(&config.server_config()).await?;
            server.run().await?;
        }
    }

    Ok(())
}
