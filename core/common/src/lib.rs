//! blog-gen 共通ライブラリ
//!
//! エラー型・ドメイン型・Outbound ポートと標準アダプタ、AWS 呼び出しの部品を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（リージョン・バケット名・オブジェクトキー・モデル ID）
pub mod domain;

/// Outbound ポート（時刻・環境変数・ログ）
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// SigV4 署名・HTTP トランスポート・S3 エラー解析
pub mod aws;
