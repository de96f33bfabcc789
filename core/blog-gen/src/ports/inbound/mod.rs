//! Inbound ポート: ドライバ（Runtime ループ・CLI）がアプリを呼び出すインターフェース

use crate::domain::InvocationResponse;
use serde_json::Value;

/// 1 イベントを処理してレスポンスを返す
///
/// 失敗もステータスコード付きのレスポンスとして返し、Err にはしない。
pub trait InvocationHandler: Send + Sync {
    fn handle(&self, event: &Value) -> InvocationResponse;
}
