//! コマンドライン（引数解析と BlogCommand への変換）

pub mod args;

pub use args::{config_to_command, parse_args, Config};
