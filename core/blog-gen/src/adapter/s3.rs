//! S3 の CreateBucket / PutObject 実装（SigV4 署名 + reqwest blocking）
//!
//! 通常は virtual-hosted style（https://{bucket}.s3.{region}.amazonaws.com/）、
//! エンドポイント上書き時は path-style（{endpoint}/{bucket}/{key}）でアクセスする。

use crate::ports::outbound::ObjectStore;
use common::aws::{
    build_client, parse_error_xml, send_signed, send_with_retry, uri_encode, AwsCredentials,
    HttpResponse, RetryPolicy, SigV4Signer,
};
use common::domain::{BucketName, ObjectKey, Region};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver};
use reqwest::{Method, Url};
use std::sync::Arc;
use std::time::Duration;

pub struct S3Store {
    region: Region,
    endpoint: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    env: Arc<dyn EnvResolver>,
    clock: Arc<dyn Clock>,
}

impl S3Store {
    pub fn new(
        region: Region,
        endpoint: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
        env: Arc<dyn EnvResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            region,
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
            timeout,
            retry,
            env,
            clock,
        }
    }

    /// バケット（key が None）またはオブジェクトの URL
    pub fn url(&self, bucket: &BucketName, key: Option<&ObjectKey>) -> Result<Url, Error> {
        let path = key.map(|k| uri_encode(k, false)).unwrap_or_default();
        let raw = match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, bucket, path),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, self.region, path),
        };
        Url::parse(&raw).map_err(|e| Error::invalid_argument(format!("Invalid S3 URL {}: {}", raw, e)))
    }

    fn send(
        &self,
        region: &Region,
        method: Method,
        url: &Url,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<HttpResponse, Error> {
        let credentials = AwsCredentials::from_env(self.env.as_ref())?;
        let client = build_client(Some(self.timeout))?;
        let signer = SigV4Signer::new("s3", region.to_string());
        let resp = send_with_retry(&self.retry, |_| {
            send_signed(
                &client,
                &signer,
                &credentials,
                method.clone(),
                url,
                headers,
                body,
                self.clock.now_utc(),
            )
        })?;
        if resp.is_success() {
            Ok(resp)
        } else {
            Err(error_from_response(&resp))
        }
    }
}

/// CreateBucket のボディ。デフォルトリージョンでは空（LocationConstraint を付けるとエラーになる）
pub fn create_bucket_body(region: &Region) -> String {
    if region.is_default() {
        String::new()
    } else {
        format!(
            "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <LocationConstraint>{}</LocationConstraint>\
             </CreateBucketConfiguration>",
            region
        )
    }
}

fn error_from_response(resp: &HttpResponse) -> Error {
    let text = resp.text();
    match parse_error_xml(&text) {
        Some((code, message)) => Error::aws(code, message),
        None => Error::http(format!("S3 error: HTTP {}: {}", resp.status, text)),
    }
}

impl ObjectStore for S3Store {
    fn create_bucket(&self, bucket: &BucketName, region: &Region) -> Result<(), Error> {
        let url = self.url(bucket, None)?;
        let body = create_bucket_body(region);
        let headers = if body.is_empty() {
            Vec::new()
        } else {
            vec![("content-type".to_string(), "application/xml".to_string())]
        };
        self.send(region, Method::PUT, &url, &headers, body.as_bytes())
            .map(|_| ())
    }

    fn put_object(&self, bucket: &BucketName, key: &ObjectKey, body: &[u8]) -> Result<(), Error> {
        let url = self.url(bucket, Some(key))?;
        let headers = vec![("content-type".to_string(), "text/plain; charset=utf-8".to_string())];
        self.send(&self.region, Method::PUT, &url, &headers, body)
            .map(|_| ())
    }
}
