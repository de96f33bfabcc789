//! AWS Signature Version 4
//!
//! canonical request → string to sign → 派生キーで HMAC、の順に組み立てる。
//! S3 以外のサービスはパスを二重エンコードし、S3 は x-amz-content-sha256 を署名に含める。

use crate::aws::credentials::AwsCredentials;
use crate::error::Error;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// RFC 3986 の unreserved 以外を %XX（大文字）にする。`encode_slash` が false なら '/' は残す
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::invalid_argument(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// サービス・リージョン単位の署名器
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    service: String,
    region: String,
    double_encode_path: bool,
    sign_content_sha256: bool,
}

impl SigV4Signer {
    pub fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        let service = service.into();
        let is_s3 = service == "s3";
        Self {
            service,
            region: region.into(),
            double_encode_path: !is_s3,
            sign_content_sha256: is_s3,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// 署名用の派生キー（kDate → kRegion → kService → kSigning）
    pub fn signing_key(&self, secret_access_key: &str, date_stamp: &str) -> Result<Vec<u8>, Error> {
        let k_date = hmac_sha256(
            format!("AWS4{}", secret_access_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }

    fn canonical_uri(&self, url: &Url) -> String {
        let path = if url.path().is_empty() { "/" } else { url.path() };
        if self.double_encode_path {
            uri_encode(path, false)
        } else {
            path.to_string()
        }
    }

    fn canonical_query(url: &Url) -> String {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (uri_encode(&k, true), uri_encode(&v, true)))
            .collect();
        pairs.sort();
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn host_header(url: &Url) -> Result<String, Error> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::invalid_argument(format!("URL has no host: {}", url)))?;
        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// `(canonical_request, signed_headers)` を返す。`headers` は host を含む全署名対象ヘッダ
    pub fn canonical_request(
        &self,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        payload_hash: &str,
    ) -> (String, String) {
        let mut canon: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| {
                let value = v.split_whitespace().collect::<Vec<_>>().join(" ");
                (k.to_lowercase(), value)
            })
            .collect();
        canon.sort();

        let canonical_headers: String = canon
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect();
        let signed_headers = canon
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.to_uppercase(),
            self.canonical_uri(url),
            Self::canonical_query(url),
            canonical_headers,
            signed_headers,
            payload_hash
        );
        (request, signed_headers)
    }

    /// リクエストに署名し、追加すべきヘッダ（authorization / x-amz-date 等）を返す
    ///
    /// `headers` は呼び出し側が送るヘッダ（content-type など）。host は URL から補う。
    pub fn sign(
        &self,
        credentials: &AwsCredentials,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, Error> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let payload_hash = sha256_hex(payload);

        let mut added: Vec<(String, String)> = vec![("x-amz-date".to_string(), amz_date.clone())];
        if self.sign_content_sha256 {
            added.push(("x-amz-content-sha256".to_string(), payload_hash.clone()));
        }
        if let Some(token) = &credentials.session_token {
            added.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let mut to_sign: Vec<(String, String)> = headers.to_vec();
        to_sign.push(("host".to_string(), Self::host_header(url)?));
        to_sign.extend(added.iter().cloned());

        let (canonical_request, signed_headers) =
            self.canonical_request(method, url, &to_sign, &payload_hash);

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            sha256_hex(canonical_request.as_bytes())
        );
        let key = self.signing_key(&credentials.secret_access_key, &date_stamp)?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        added.push((
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, credentials.access_key_id, credential_scope, signed_headers, signature
            ),
        ));
        Ok(added)
    }
}
