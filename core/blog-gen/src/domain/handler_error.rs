//! 呼び出し境界で 500 に変換されるエラー

/// 入力の解釈失敗やハンドラ内の想定外の失敗
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("event has no 'body'")]
    MissingBody,
    #[error("'body' is not a string")]
    BodyNotString,
    #[error("'body' is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("'body' is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("request has no 'blog_topic'")]
    MissingTopic,
    #[error("handler panicked: {0}")]
    Panic(String),
}
