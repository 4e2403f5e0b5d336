//! ドメイン層
//!
//! 接続の識別情報、接続レジストリ、チャンクの整形、履歴ストアのインターフェースを定義します。
//! I/O を伴う具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

mod connection;
mod error;
mod format;
mod history;
mod identity;
mod registry;

pub use connection::{Connection, OutboundChannel};
pub use error::{HistoryError, RegistryError};
pub use format::{ChunkFormatter, JOINED_TEXT, join_announcement};
pub use history::HistoryStore;
#[cfg(test)]
pub use history::MockHistoryStore;
pub use identity::{AVATAR_RANGE, ConnectionId, Identity, PREFIX_SEPARATOR, avatar_glyph};
pub use registry::ConnectionRegistry;
