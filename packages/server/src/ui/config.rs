//! Server configuration.

use std::path::PathBuf;

/// Default port of a chat session.
pub const DEFAULT_PORT: u16 = 3333;

/// Settings a [`Server`](super::Server) is bound with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to listen on
    pub bind: String,
    /// Port to listen on; `0` picks a free port
    pub port: u16,
    /// Directory the `history-<port>.txt` file is created in
    pub history_dir: PathBuf,
    /// Register stdin/stdout as Connection 0
    pub console: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            history_dir: PathBuf::from("."),
            console: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
