//! TCP chat relay server (UI layer).
//!
//! Accepts connections, turns each into a session member, and runs its relay.

mod config;
mod handler;
mod server;
mod signal;

pub use config::ServerConfig;
pub use handler::{ActiveConnection, open_connection};
pub use server::{Server, ServerError};
pub use signal::shutdown_signal;
