//! 履歴ストアの実装
//!
//! - `file`: セッションごとの追記専用ファイル（`history-<port>.txt`）
//! - `inmemory`: テストや一時的なセッション向けのインメモリ実装

pub mod file;
pub mod inmemory;

pub use file::{FileHistoryStore, history_path};
pub use inmemory::InMemoryHistoryStore;

/// Size of the chunks a replay is split into.
pub const REPLAY_CHUNK_SIZE: usize = 8 * 1024;
