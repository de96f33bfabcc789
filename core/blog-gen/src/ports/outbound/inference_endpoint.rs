//! 推論エンドポイント Outbound ポート
//!
//! リクエスト／レスポンスは JSON 文字列のまま扱い、ペイロード生成と解析は usecase 側で行う。

use common::domain::ModelId;
use common::error::Error;

/// テキスト生成エンドポイント（Bedrock InvokeModel 等）
pub trait InferenceEndpoint: Send + Sync {
    /// エンドポイント名（ログ用）
    fn name(&self) -> &str;

    /// モデルを呼び出してレスポンスボディ（JSON 文字列）を返す
    ///
    /// タイムアウトとリトライは実装側のトランスポート設定に従う。
    fn invoke_model(&self, model_id: &ModelId, body: &str) -> Result<String, Error>;
}
