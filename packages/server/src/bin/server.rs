//! Irori chat relay server.
//!
//! Hosts a session: accepts peers on the given port and registers the local
//! terminal as Connection 0.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --bind 127.0.0.1 --port 4000 --history-dir /tmp
//! ```

use std::path::PathBuf;

use clap::Parser;
use irori_server::ui::{Server, ServerConfig};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Line-oriented TCP chat relay with session history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    bind: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3333")]
    port: u16,

    /// Directory to write the session history file to
    #[arg(long, env = "IRORI_HISTORY_DIR", default_value = ".")]
    history_dir: PathBuf,

    /// Do not join the local terminal as a participant
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        history_dir: args.history_dir,
        console: !args.no_console,
    };

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // The console's blocking stdin read would otherwise hold the runtime open.
    std::process::exit(0);
}
