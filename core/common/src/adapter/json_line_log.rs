//! JSONL で 1 レコード 1 行を書き出す Log 実装
//!
//! Lambda では stdout に書けば CloudWatch Logs に届く。min_level より詳細なレコードは捨てる。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::io::Write;
use std::sync::Mutex;

/// 標準ストリームの出力先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    /// 標準出力をコマンドの結果に使うとき
    Stderr,
}

/// 任意の Write へ JSONL を書き出す Log 実装
pub struct JsonLineLog {
    out: Mutex<Box<dyn Write + Send>>,
    min_level: LogLevel,
}

impl JsonLineLog {
    pub fn new(out: Box<dyn Write + Send>, min_level: LogLevel) -> Self {
        Self {
            out: Mutex::new(out),
            min_level,
        }
    }

    /// stdout へ出力する logger
    pub fn stdout(min_level: LogLevel) -> Self {
        Self::new(Box::new(std::io::stdout()), min_level)
    }

    pub fn stderr(min_level: LogLevel) -> Self {
        Self::new(Box::new(std::io::stderr()), min_level)
    }

    pub fn to_sink(sink: LogSink, min_level: LogLevel) -> Self {
        match sink {
            LogSink::Stdout => Self::stdout(min_level),
            LogSink::Stderr => Self::stderr(min_level),
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Log for JsonLineLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if record.level > self.min_level {
            return Ok(());
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::io_msg("log writer lock poisoned"))?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// 何も出力しない Log 実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}
