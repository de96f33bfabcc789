//! AWS クレデンシャル
//!
//! Lambda 実行環境は AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY / AWS_SESSION_TOKEN を設定する。
//! 呼び出しごとに解決するので、欠如は起動失敗ではなくその呼び出しの失敗になる。

use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::fmt;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// 一時クレデンシャルのときのみ
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    pub fn from_env(env: &dyn EnvResolver) -> Result<Self, Error> {
        let access_key_id = env
            .var(ACCESS_KEY_ID_VAR)
            .ok_or_else(|| Error::env(format!("{} environment variable is not set", ACCESS_KEY_ID_VAR)))?;
        let secret_access_key = env.var(SECRET_ACCESS_KEY_VAR).ok_or_else(|| {
            Error::env(format!("{} environment variable is not set", SECRET_ACCESS_KEY_VAR))
        })?;
        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: env.var(SESSION_TOKEN_VAR),
        })
    }
}

// secret をログに出さない
impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
