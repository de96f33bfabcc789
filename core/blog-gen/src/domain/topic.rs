//! ブログのトピック（リクエストから取り出した文字列そのまま）

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogTopic(String);

impl BlogTopic {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for BlogTopic {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for BlogTopic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
