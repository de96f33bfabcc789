//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。終了コードは sysexits 風（64: 引数不正、74: I/O・HTTP、70: その他）。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数・設定値の不正
    #[error("{0}")]
    InvalidArgument(String),
    /// 環境変数の欠如など
    #[error("{0}")]
    Env(String),
    /// HTTP 通信の失敗（接続・タイムアウト・非 2xx）
    #[error("{0}")]
    Http(String),
    /// JSON のパース・シリアライズ失敗
    #[error("{0}")]
    Json(String),
    /// AWS サービスが返したエラー（S3 の <Code> 等）
    #[error("{code}: {message}")]
    Aws { code: String, message: String },
    #[error("{0}")]
    Io(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn aws(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Aws {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// AWS エラーコード（Aws 以外は None）
    pub fn aws_code(&self) -> Option<&str> {
        match self {
            Self::Aws { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// 使い方の誤りか（main で usage を表示するかの判定）
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::Env(_) => 64,
            Self::Http(_) | Self::Io(_) | Self::Aws { .. } => 74,
            Self::Json(_) => 70,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
