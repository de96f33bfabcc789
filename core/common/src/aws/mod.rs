//! AWS への HTTP 呼び出しに必要な部品（SDK を使わず reqwest で直接叩く）
//!
//! - credentials: 環境変数からのクレデンシャル解決
//! - sigv4: Signature Version 4 署名
//! - transport: タイムアウト付きクライアントとリトライ
//! - error_xml: S3 のエラーレスポンス (XML) 解析

pub mod credentials;
pub mod error_xml;
pub mod sigv4;
pub mod transport;

pub use credentials::AwsCredentials;
pub use error_xml::parse_error_xml;
pub use sigv4::{uri_encode, SigV4Signer};
pub use transport::{build_client, send_signed, send_with_retry, HttpResponse, RetryPolicy};
