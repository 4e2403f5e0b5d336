//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装と、I/O の詳細を扱います。
//!
//! - `history`: 履歴ストアの実装（ファイル、インメモリ）
//! - `transport`: TCP ソケットと標準入出力を同一視する双方向バイトストリーム
//! - `pusher`: 接続ごとの送信ループ

pub mod history;
pub mod pusher;
pub mod transport;
