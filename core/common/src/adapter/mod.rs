//! アダプター（外界の I/O を trait で抽象化）
//!
//! usecase は ports の trait 経由でのみ時刻・環境変数・ログに触れる。
//! 実装は標準実装（Std*）やテスト用のモックを注入する。

pub mod json_line_log;
pub mod std_clock;
pub mod std_env_resolver;

pub use json_line_log::{JsonLineLog, LogSink, NoopLog};
pub use std_clock::StdClock;
pub use std_env_resolver::StdEnvResolver;
