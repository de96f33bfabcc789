//! Bedrock Runtime InvokeModel の実装（SigV4 署名 + reqwest blocking）

use crate::ports::outbound::InferenceEndpoint;
use common::aws::{build_client, send_signed, send_with_retry, uri_encode, AwsCredentials, HttpResponse, RetryPolicy, SigV4Signer};
use common::domain::{ModelId, Region};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver};
use reqwest::{Method, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const SIGNING_NAME: &str = "bedrock";

/// Bedrock Runtime クライアント
///
/// 呼び出しごとにクレデンシャルを解決し、HTTP クライアントを作る。
pub struct BedrockRuntime {
    region: Region,
    endpoint: Option<String>,
    read_timeout: Duration,
    retry: RetryPolicy,
    env: Arc<dyn EnvResolver>,
    clock: Arc<dyn Clock>,
}

impl BedrockRuntime {
    pub fn new(
        region: Region,
        endpoint: Option<String>,
        read_timeout: Duration,
        retry: RetryPolicy,
        env: Arc<dyn EnvResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            region,
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
            read_timeout,
            retry,
            env,
            clock,
        }
    }

    fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    /// `{base}/model/{modelId}/invoke`（モデル ID の ':' 等はエンコードする）
    pub fn invoke_url(&self, model_id: &ModelId) -> Result<Url, Error> {
        let raw = format!("{}/model/{}/invoke", self.base_url(), uri_encode(model_id, true));
        Url::parse(&raw).map_err(|e| Error::invalid_argument(format!("Invalid Bedrock URL {}: {}", raw, e)))
    }
}

/// 非 2xx のレスポンスをエラーにする（x-amzn-errortype と message を使う）
fn error_from_response(resp: &HttpResponse) -> Error {
    let text = resp.text();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", resp.status, text));
    match resp.header("x-amzn-errortype") {
        // "ValidationException:http://internal.amazon.com/coral/..." の形式があるので ':' 以降は捨てる
        Some(t) => Error::aws(t.split(':').next().unwrap_or(t), message),
        None => Error::http(format!("Bedrock error: {}", message)),
    }
}

impl InferenceEndpoint for BedrockRuntime {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn invoke_model(&self, model_id: &ModelId, body: &str) -> Result<String, Error> {
        let credentials = AwsCredentials::from_env(self.env.as_ref())?;
        let client = build_client(Some(self.read_timeout))?;
        let signer = SigV4Signer::new(SIGNING_NAME, self.region.to_string());
        let url = self.invoke_url(model_id)?;
        let headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ];

        let resp = send_with_retry(&self.retry, |_| {
            send_signed(
                &client,
                &signer,
                &credentials,
                Method::POST,
                &url,
                &headers,
                body.as_bytes(),
                self.clock.now_utc(),
            )
        })?;

        if !resp.is_success() {
            return Err(error_from_response(&resp));
        }
        Ok(resp.text())
    }
}
