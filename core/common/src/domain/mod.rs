//! ドメイン型（Newtype）
//!
//! String を直接運ばず、意味のある型に包んで境界を明確にする。

use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_newtype!(
    /// AWS リージョン（eu-west-1 等）
    Region
);

string_newtype!(
    /// S3 バケット名
    BucketName
);

string_newtype!(
    /// S3 オブジェクトキー（blog-output/123456.txt 等）
    ObjectKey
);

string_newtype!(
    /// Bedrock のモデル ID（eu.meta.llama3-2-3b-instruct-v1:0 等）
    ModelId
);

/// CreateBucket に LocationConstraint を付けないリージョン
pub const DEFAULT_REGION: &str = "us-east-1";

impl Region {
    /// S3 のデフォルトリージョン（us-east-1）か
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_REGION
    }
}
