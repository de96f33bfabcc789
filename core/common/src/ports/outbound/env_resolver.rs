//! 環境変数解決 Outbound ポート
//!
//! 設定の解決は std::env に直接触れず、この trait 経由で行う（テストでは固定マップを注入する）。

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用の `MapEnv` など。
pub trait EnvResolver: Send + Sync {
    /// 変数の値。未設定または空文字のときは None
    fn var(&self, key: &str) -> Option<String>;
}
