//! 時刻取得 Outbound ポート
//!
//! usecase はこの trait 経由で「現在時刻」を取得し、オブジェクトキーや SigV4 の日付に使う。

use chrono::{DateTime, NaiveDateTime, Utc};

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の固定時刻など。
pub trait Clock: Send + Sync {
    /// 現在時刻（UTC）。署名の x-amz-date 等に使う
    fn now_utc(&self) -> DateTime<Utc>;

    /// 現在のローカル壁時計時刻（オブジェクトキーの HHMMSS に使う）
    fn now_local(&self) -> NaiveDateTime;
}
