//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（Runtime ループ・CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（推論・ストレージ・Runtime API）を使うための trait

pub mod inbound;
pub mod outbound;
