//! Echo 推論エンドポイント
//!
//! 実際のモデルは呼ばず、プロンプト中の指示文をそのまま generation として返す。
//! クレデンシャル無しでのローカル確認用。

use crate::ports::outbound::InferenceEndpoint;
use common::domain::ModelId;
use common::error::Error;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default)]
pub struct EchoInference;

impl EchoInference {
    pub fn new() -> Self {
        Self
    }
}

/// チャットテンプレートの特殊トークンとロールヘッダを取り除く
fn strip_template(prompt: &str) -> String {
    let mut text = prompt.to_string();
    for role in ["system", "user", "assistant"] {
        text = text.replace(&format!("<|start_header_id|>{}<|end_header_id|>", role), "");
    }
    for token in ["<|begin_of_text|>", "<|eot_id|>"] {
        text = text.replace(token, "");
    }
    text.trim().to_string()
}

impl InferenceEndpoint for EchoInference {
    fn name(&self) -> &str {
        "echo"
    }

    fn invoke_model(&self, model_id: &ModelId, body: &str) -> Result<String, Error> {
        let request: Value = serde_json::from_str(body)?;
        let prompt = request["prompt"]
            .as_str()
            .ok_or_else(|| Error::json("request has no prompt"))?;
        let response = json!({
            "generation": format!("[echo:{}] {}", model_id, strip_template(prompt)),
            "prompt_token_count": null,
            "generation_token_count": 0,
            "stop_reason": "stop"
        });
        Ok(response.to_string())
    }
}
