//! UseCase 層
//!
//! - `session`: 接続レジストリと履歴ストアを一つの排他区間で扱うチャットセッション
//! - `relay`: 接続ごとの「読み込み → 整形 → ブロードキャスト」パイプライン

mod error;
mod relay;
mod session;

pub use error::{RelayError, SessionError};
pub use relay::{READ_BUFFER_SIZE, relay};
pub use session::{BroadcastReport, ChatSession, MAX_CONSECUTIVE_HISTORY_FAILURES};
