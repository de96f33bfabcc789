//! blog-gen の実行モード（Command Pattern）

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum BlogCommand {
    /// ヘルプ表示
    Help,
    /// Lambda Runtime API のループ（AWS_LAMBDA_RUNTIME_API 必須）
    Serve,
    /// イベントを 1 回だけ処理してレスポンスを表示
    Invoke { event: Value },
}
