//! HTTP トランスポート（reqwest blocking）とリトライ
//!
//! リトライ対象は送信失敗・429・5xx のみ。4xx はそのまま呼び出し側に返す。

use crate::aws::credentials::AwsCredentials;
use crate::aws::sigv4::SigV4Signer;
use crate::error::Error;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::{Method, Url};
use std::thread;
use std::time::Duration;

/// リトライ方針。`max_retries` は初回を含まない再試行回数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// 再試行しない
    pub fn none() -> Self {
        Self::with_max_retries(0)
    }

    /// `retry`（0 始まり）回目の再試行前に待つ時間（指数バックオフ、上限あり）
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.min(16)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// ステータスとボディだけを持つレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// x-amzn-errortype 等、エラー判定に使うヘッダ（小文字名）
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// タイムアウト付きのクライアントを作る。`timeout` が None ならタイムアウトなし
pub fn build_client(timeout: Option<Duration>) -> Result<Client, Error> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
}

/// `send(attempt)` をリトライ方針に従って呼ぶ
///
/// 最後の試行の結果（非 2xx レスポンスを含む）を返す。送信失敗が続いた場合は最後のエラー。
pub fn send_with_retry<F>(policy: &RetryPolicy, mut send: F) -> Result<HttpResponse, Error>
where
    F: FnMut(u32) -> Result<HttpResponse, Error>,
{
    let mut attempt = 0;
    loop {
        let result = send(attempt);
        let retryable = match &result {
            Ok(resp) => is_retryable_status(resp.status),
            Err(Error::Http(_)) => true,
            Err(_) => false,
        };
        if !retryable || attempt >= policy.max_retries {
            return result;
        }
        thread::sleep(policy.delay_for(attempt));
        attempt += 1;
    }
}

/// SigV4 署名付きリクエストを 1 回送る
pub fn send_signed(
    client: &Client,
    signer: &SigV4Signer,
    credentials: &AwsCredentials,
    method: Method,
    url: &Url,
    headers: &[(String, String)],
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<HttpResponse, Error> {
    let auth_headers = signer.sign(credentials, method.as_str(), url, headers, body, now)?;

    let mut builder = client.request(method, url.clone());
    for (k, v) in headers.iter().chain(auth_headers.iter()) {
        builder = builder.header(k.as_str(), v.as_str());
    }
    let response = builder
        .body(body.to_vec())
        .send()
        .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

    let status = response.status().as_u16();
    let resp_headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v| (k.as_str().to_lowercase(), v.to_string()))
        })
        .collect();
    let body = response
        .bytes()
        .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
    Ok(HttpResponse {
        status,
        body: body.to_vec(),
        headers: resp_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_delay_is_exponential_and_capped() {
        let p = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(p.delay_for(0), Duration::from_millis(100));
        assert_eq!(p.delay_for(1), Duration::from_millis(200));
        assert_eq!(p.delay_for(2), Duration::from_millis(400));
        assert_eq!(p.delay_for(3), Duration::from_millis(500));
        assert_eq!(p.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn test_success_is_not_retried() {
        let mut calls = 0;
        let resp = send_with_retry(&fast_policy(3), |_| {
            calls += 1;
            Ok(HttpResponse::new(200, "ok"))
        })
        .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_server_error_retried_until_budget_exhausted() {
        let mut attempts = Vec::new();
        let resp = send_with_retry(&fast_policy(3), |a| {
            attempts.push(a);
            Ok(HttpResponse::new(503, "busy"))
        })
        .unwrap();
        assert_eq!(resp.status, 503);
        assert_eq!(attempts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_throttle_then_success() {
        let mut calls = 0;
        let resp = send_with_retry(&fast_policy(3), |_| {
            calls += 1;
            if calls < 3 {
                Ok(HttpResponse::new(429, "slow down"))
            } else {
                Ok(HttpResponse::new(200, "{}"))
            }
        })
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_client_error_is_returned_immediately() {
        let mut calls = 0;
        let resp = send_with_retry(&fast_policy(3), |_| {
            calls += 1;
            Ok(HttpResponse::new(409, "conflict"))
        })
        .unwrap();
        assert_eq!(resp.status, 409);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_transport_error_retried_and_last_error_returned() {
        let mut calls = 0;
        let err = send_with_retry(&fast_policy(2), |a| {
            calls += 1;
            Err(Error::http(format!("connection reset #{}", a)))
        })
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_non_transport_error_not_retried() {
        let mut calls = 0;
        let err = send_with_retry(&fast_policy(3), |_| {
            calls += 1;
            Err(Error::invalid_argument("bad url"))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(err.is_usage());
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let mut resp = HttpResponse::new(400, "");
        resp.headers.push(("x-amzn-errortype".to_string(), "ValidationException".to_string()));
        assert_eq!(resp.header("X-Amzn-ErrorType"), Some("ValidationException"));
        assert!(!resp.is_success());
    }
}
