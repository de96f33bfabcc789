//! 標準時刻実装（chrono の Utc / Local を委譲）

use crate::ports::outbound::Clock;
use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// システム時計を使う Clock 実装
#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
