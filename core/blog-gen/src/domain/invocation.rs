//! Lambda Runtime API から受け取る 1 回分の呼び出し

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Lambda-Runtime-Aws-Request-Id
    pub request_id: String,
    /// Lambda-Runtime-Deadline-Ms（Unix epoch ミリ秒）
    pub deadline_ms: Option<u64>,
    /// Lambda-Runtime-Trace-Id
    pub trace_id: Option<String>,
    pub function_arn: Option<String>,
    pub event: Value,
}

impl Invocation {
    /// テスト用: ヘッダ由来の項目を持たない呼び出し
    #[allow(dead_code)]
    pub fn new(request_id: impl Into<String>, event: Value) -> Self {
        Self {
            request_id: request_id.into(),
            deadline_ms: None,
            trace_id: None,
            function_arn: None,
            event,
        }
    }
}

/// Runtime API の /error エンドポイントに送るボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeError {
    pub error_message: String,
    pub error_type: String,
}

impl RuntimeError {
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
        }
    }
}
