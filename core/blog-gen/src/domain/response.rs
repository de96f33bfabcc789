//! 呼び出しへのレスポンス（API Gateway プロキシ形式）
//!
//! body は JSON エンコード済みの文字列（"\"Blog generation failed\"" のように引用符を含む）。

use serde::Serialize;

pub const MSG_SUCCESS: &str = "Blog generation completed successfully";
pub const MSG_GENERATION_FAILED: &str = "Blog generation failed";
pub const MSG_SAVE_FAILED: &str = "Failed to save blog to S3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    /// `message` を JSON 文字列としてエンコードした body を持つレスポンス
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::Value::String(message.to_string()).to_string(),
        }
    }

    pub fn success() -> Self {
        Self::new(200, MSG_SUCCESS)
    }

    pub fn generation_failed() -> Self {
        Self::new(400, MSG_GENERATION_FAILED)
    }

    pub fn save_failed() -> Self {
        Self::new(500, MSG_SAVE_FAILED)
    }

    pub fn internal_error(detail: &str) -> Self {
        Self::new(500, &format!("Internal error: {}", detail))
    }

    /// テスト用: body をデコードしたメッセージ（JSON 文字列でなければ body そのまま）
    #[allow(dead_code)]
    pub fn message(&self) -> String {
        serde_json::from_str::<String>(&self.body).unwrap_or_else(|_| self.body.clone())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
