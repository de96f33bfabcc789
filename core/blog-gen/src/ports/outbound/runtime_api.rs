//! Lambda Runtime API Outbound ポート
//!
//! 実装は `adapter::LambdaRuntimeClient`。テストでは固定のイベント列を返す Fake を渡す。

use crate::domain::{Invocation, RuntimeError};
use common::error::Error;

pub trait RuntimeApi: Send + Sync {
    /// 次の呼び出しを待って受け取る（ロングポーリング）
    fn next_invocation(&self) -> Result<Invocation, Error>;

    /// 呼び出しの結果を返す
    fn send_response(&self, request_id: &str, body: &str) -> Result<(), Error>;

    /// 呼び出しの失敗を報告する
    fn send_invocation_error(&self, request_id: &str, error: &RuntimeError) -> Result<(), Error>;

    /// 初期化の失敗を報告する（設定の解決に失敗した場合など）
    fn send_init_error(&self, error: &RuntimeError) -> Result<(), Error>;
}
