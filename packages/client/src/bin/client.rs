//! Irori chat peer.
//!
//! Joins the chat session at HOST:PORT. If nobody is listening there, starts
//! a new session on PORT and joins it from this terminal.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori
//! PORT=4000 HOST=192.168.0.10 cargo run --bin irori
//! ```

use std::path::PathBuf;

use clap::Parser;

use irori_client::ClientConfig;
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori")]
#[command(about = "Terminal chat over raw TCP: join a session or host one", long_about = None)]
struct Args {
    /// Host of the session to join
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port of the session to join (or to host on)
    #[arg(short = 'p', long, env = "PORT", default_value = "3333")]
    port: u16,

    /// Address to listen on when hosting
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Directory to write the session history file to when hosting
    #[arg(long, env = "IRORI_HISTORY_DIR", default_value = ".")]
    history_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig {
        host: args.host,
        port: args.port,
        bind: args.bind,
        history_dir: args.history_dir,
    };

    if let Err(e) = irori_client::run(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }

    // A blocking stdin read would otherwise hold the runtime open.
    std::process::exit(0);
}
