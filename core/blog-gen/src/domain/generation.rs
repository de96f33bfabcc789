//! 生成結果
//!
//! 「呼び出しは成功したが本文が空」と「本文を得られなかった」を区別する。
//! 外部へのレスポンスではどちらも 400 になるが、ログでは区別できる。

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// 空でない本文
    Text(String),
    /// モデルは応答したが generation が空文字
    Empty,
    /// 本文を得られなかった（クレデンシャル・通信・応答形式のいずれかの失敗）
    Failed { reason: String },
}

impl Generation {
    /// 応答から取り出した文字列を Text / Empty に分ける
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// テスト用: 生成テキスト（Text のときだけ）
    #[allow(dead_code)]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// ログの kind 等に使う短い名前
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Empty => "empty",
            Self::Failed { .. } => "failed",
        }
    }
}
