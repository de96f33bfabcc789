//! Lambda Runtime API クライアント（custom runtime / provided.al2023 用）
//!
//! next はロングポーリングなのでクライアントにタイムアウトを付けない。

use crate::domain::{Invocation, RuntimeError};
use crate::ports::outbound::RuntimeApi;
use common::error::Error;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;

pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";
const API_VERSION: &str = "2018-06-01";

const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";
const DEADLINE_HEADER: &str = "lambda-runtime-deadline-ms";
const TRACE_ID_HEADER: &str = "lambda-runtime-trace-id";
const FUNCTION_ARN_HEADER: &str = "lambda-runtime-invoked-function-arn";
const ERROR_TYPE_HEADER: &str = "Lambda-Runtime-Function-Error-Type";

pub struct LambdaRuntimeClient {
    base_url: String,
    client: Client,
}

impl LambdaRuntimeClient {
    /// `api` は AWS_LAMBDA_RUNTIME_API の値（host:port）
    pub fn new(api: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: format!("http://{}/{}", api.trim_end_matches('/'), API_VERSION),
            client,
        })
    }

    pub fn next_url(&self) -> String {
        format!("{}/runtime/invocation/next", self.base_url)
    }

    pub fn response_url(&self, request_id: &str) -> String {
        format!("{}/runtime/invocation/{}/response", self.base_url, request_id)
    }

    pub fn error_url(&self, request_id: &str) -> String {
        format!("{}/runtime/invocation/{}/error", self.base_url, request_id)
    }

    pub fn init_error_url(&self) -> String {
        format!("{}/runtime/init/error", self.base_url)
    }

    fn post(&self, url: &str, body: String, error_type: Option<&str>) -> Result<(), Error> {
        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(t) = error_type {
            builder = builder.header(ERROR_TYPE_HEADER, t);
        }
        let response = builder
            .send()
            .map_err(|e| Error::http(format!("Runtime API request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::http(format!("Runtime API error: HTTP {}: {}", status, text)));
        }
        Ok(())
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// next のレスポンス（ヘッダとボディ）から Invocation を組み立てる
pub fn invocation_from_parts(headers: &HeaderMap, body: &str) -> Result<Invocation, Error> {
    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .ok_or_else(|| Error::http(format!("Runtime API response has no {} header", REQUEST_ID_HEADER)))?;
    let event: Value = serde_json::from_str(body)
        .map_err(|e| Error::json(format!("Failed to parse invocation event: {}", e)))?;
    Ok(Invocation {
        request_id,
        deadline_ms: header_str(headers, DEADLINE_HEADER).and_then(|s| s.parse().ok()),
        trace_id: header_str(headers, TRACE_ID_HEADER),
        function_arn: header_str(headers, FUNCTION_ARN_HEADER),
        event,
    })
}

impl RuntimeApi for LambdaRuntimeClient {
    fn next_invocation(&self) -> Result<Invocation, Error> {
        let response = self
            .client
            .get(self.next_url())
            .send()
            .map_err(|e| Error::http(format!("Runtime API request failed: {}", e)))?;
        let headers = response.headers().clone();
        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read invocation: {}", e)))?;
        invocation_from_parts(&headers, &body)
    }

    fn send_response(&self, request_id: &str, body: &str) -> Result<(), Error> {
        self.post(&self.response_url(request_id), body.to_string(), None)
    }

    fn send_invocation_error(&self, request_id: &str, error: &RuntimeError) -> Result<(), Error> {
        let body = serde_json::to_string(error)?;
        self.post(&self.error_url(request_id), body, Some("Unhandled"))
    }

    fn send_init_error(&self, error: &RuntimeError) -> Result<(), Error> {
        let body = serde_json::to_string(error)?;
        self.post(&self.init_error_url(), body, Some("Unhandled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_urls() {
        let c = LambdaRuntimeClient::new("127.0.0.1:9001").unwrap();
        assert_eq!(c.next_url(), "http://127.0.0.1:9001/2018-06-01/runtime/invocation/next");
        assert_eq!(
            c.response_url("req-1"),
            "http://127.0.0.1:9001/2018-06-01/runtime/invocation/req-1/response"
        );
        assert_eq!(
            c.error_url("req-1"),
            "http://127.0.0.1:9001/2018-06-01/runtime/invocation/req-1/error"
        );
        assert_eq!(c.init_error_url(), "http://127.0.0.1:9001/2018-06-01/runtime/init/error");
    }

    #[test]
    fn test_invocation_from_parts() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("8476a536-e9f4-11e8-9739-2dfe598c3fcd"));
        headers.insert(DEADLINE_HEADER, HeaderValue::from_static("1542409706888"));
        headers.insert(TRACE_ID_HEADER, HeaderValue::from_static("Root=1-5bef4de7-ad49b0e87f6ef6c87fc2e700"));
        let body = r#"{"body":"{\"blog_topic\":\"cats\"}"}"#;
        let inv = invocation_from_parts(&headers, body).unwrap();
        assert_eq!(inv.request_id, "8476a536-e9f4-11e8-9739-2dfe598c3fcd");
        assert_eq!(inv.deadline_ms, Some(1542409706888));
        assert_eq!(inv.trace_id.as_deref(), Some("Root=1-5bef4de7-ad49b0e87f6ef6c87fc2e700"));
        assert_eq!(inv.function_arn, None);
        assert_eq!(inv.event["body"], "{\"blog_topic\":\"cats\"}");
    }

    #[test]
    fn test_invocation_without_request_id_is_error() {
        let err = invocation_from_parts(&HeaderMap::new(), "{}").unwrap_err();
        assert!(err.to_string().contains(REQUEST_ID_HEADER));
    }

    #[test]
    fn test_invocation_with_bad_event_is_error() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("r"));
        let err = invocation_from_parts(&headers, "not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
