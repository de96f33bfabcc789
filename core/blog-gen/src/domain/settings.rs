//! 実行時設定
//!
//! リージョン・バケット・モデル等はコンパイル時定数ではなく、起動時に解決して handler に渡す。

use crate::domain::{CompletionParams, KeySuffix};
use common::domain::{BucketName, ModelId, Region};
use common::error::Error;
use common::ports::outbound::{EnvResolver, LogLevel};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "eu-west-1";
pub const DEFAULT_BUCKET: &str = "boto3-bedrock-genai-project";
pub const DEFAULT_KEY_PREFIX: &str = "blog-output/";
pub const DEFAULT_MODEL_ID: &str = "eu.meta.llama3-2-3b-instruct-v1:0";
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);
/// S3 呼び出しのタイムアウト。reqwest blocking の既定値と同じ 30 秒
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const ENV_REGION: &str = "BLOG_GEN_REGION";
pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
pub const ENV_KEY_PREFIX: &str = "BLOG_GEN_KEY_PREFIX";
pub const ENV_KEY_SUFFIX: &str = "BLOG_GEN_KEY_SUFFIX";
pub const ENV_MODEL_ID: &str = "BLOG_GEN_MODEL_ID";
pub const ENV_TEMPERATURE: &str = "BLOG_GEN_TEMPERATURE";
pub const ENV_TOP_P: &str = "BLOG_GEN_TOP_P";
pub const ENV_MAX_GEN_LEN: &str = "BLOG_GEN_MAX_GEN_LEN";
pub const ENV_READ_TIMEOUT_SECS: &str = "BLOG_GEN_READ_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "BLOG_GEN_MAX_RETRIES";
pub const ENV_BEDROCK_ENDPOINT: &str = "BLOG_GEN_BEDROCK_ENDPOINT";
pub const ENV_S3_ENDPOINT: &str = "BLOG_GEN_S3_ENDPOINT";
pub const ENV_INFERENCE: &str = "BLOG_GEN_INFERENCE";
pub const ENV_LOG_LEVEL: &str = "BLOG_GEN_LOG_LEVEL";

/// 推論エンドポイントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferenceKind {
    /// Bedrock Runtime InvokeModel
    #[default]
    Bedrock,
    /// ネットワークを使わずプロンプトを返す（ローカル確認用）
    Echo,
}

impl InferenceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" => Some(Self::Bedrock),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub region: Region,
    pub bucket: BucketName,
    pub key_prefix: String,
    pub key_suffix: KeySuffix,
    pub model_id: ModelId,
    pub completion: CompletionParams,
    /// 推論呼び出しの読み取りタイムアウト
    pub read_timeout: Duration,
    /// S3 呼び出しのタイムアウト
    pub storage_timeout: Duration,
    /// 初回を含まない再試行回数
    pub max_retries: u32,
    pub bedrock_endpoint: Option<String>,
    /// 指定時は path-style でアクセスする（LocalStack 等）
    pub s3_endpoint: Option<String>,
    pub inference: InferenceKind,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: Region::new(DEFAULT_REGION),
            bucket: BucketName::new(DEFAULT_BUCKET),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            key_suffix: KeySuffix::None,
            model_id: ModelId::new(DEFAULT_MODEL_ID),
            completion: CompletionParams::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            bedrock_endpoint: None,
            s3_endpoint: None,
            inference: InferenceKind::Bedrock,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// デフォルト → 環境変数 → CLI 上書きの順に解決する
    ///
    /// 解釈できない値は `Error::InvalidArgument`（変数名を含む）。
    pub fn resolve(env: &dyn EnvResolver, overrides: &SettingsOverrides) -> Result<Self, Error> {
        let mut s = Self::default();

        if let Some(v) = env.var(ENV_REGION) {
            s.region = Region::new(v);
        }
        if let Some(v) = env.var(ENV_BUCKET) {
            s.bucket = BucketName::new(v);
        }
        if let Some(v) = env.var(ENV_KEY_PREFIX) {
            s.key_prefix = v;
        }
        if let Some(v) = env.var(ENV_KEY_SUFFIX) {
            s.key_suffix = KeySuffix::parse(&v).ok_or_else(|| invalid(ENV_KEY_SUFFIX, &v))?;
        }
        if let Some(v) = env.var(ENV_MODEL_ID) {
            s.model_id = ModelId::new(v);
        }
        if let Some(v) = parse_var::<f64>(env, ENV_TEMPERATURE)? {
            s.completion.temperature = v;
        }
        if let Some(v) = parse_var::<f64>(env, ENV_TOP_P)? {
            s.completion.top_p = v;
        }
        if let Some(v) = parse_var::<u32>(env, ENV_MAX_GEN_LEN)? {
            s.completion.max_gen_len = v;
        }
        if let Some(v) = parse_var::<u64>(env, ENV_READ_TIMEOUT_SECS)? {
            s.read_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parse_var::<u32>(env, ENV_MAX_RETRIES)? {
            s.max_retries = v;
        }
        s.bedrock_endpoint = env.var(ENV_BEDROCK_ENDPOINT);
        s.s3_endpoint = env.var(ENV_S3_ENDPOINT);
        if let Some(v) = env.var(ENV_INFERENCE) {
            s.inference = InferenceKind::parse(&v).ok_or_else(|| invalid(ENV_INFERENCE, &v))?;
        }
        if let Some(v) = env.var(ENV_LOG_LEVEL) {
            s.log_level = LogLevel::parse(&v).ok_or_else(|| invalid(ENV_LOG_LEVEL, &v))?;
        }

        if let Some(v) = &overrides.region {
            s.region = Region::new(v.as_str());
        }
        if let Some(v) = &overrides.bucket {
            s.bucket = BucketName::new(v.as_str());
        }
        if let Some(v) = &overrides.model_id {
            s.model_id = ModelId::new(v.as_str());
        }
        if overrides.echo {
            s.inference = InferenceKind::Echo;
        }
        if overrides.verbose {
            s.log_level = LogLevel::Debug;
        }

        if !(0.0..=1.0).contains(&s.completion.top_p) {
            return Err(invalid(ENV_TOP_P, &s.completion.top_p.to_string()));
        }
        if s.completion.temperature < 0.0 {
            return Err(invalid(ENV_TEMPERATURE, &s.completion.temperature.to_string()));
        }
        Ok(s)
    }
}

fn invalid(var: &str, value: &str) -> Error {
    Error::invalid_argument(format!("invalid value for {}: {:?}", var, value))
}

fn parse_var<T: FromStr>(env: &dyn EnvResolver, var: &str) -> Result<Option<T>, Error> {
    match env.var(var) {
        Some(v) => v.trim().parse::<T>().map(Some).map_err(|_| invalid(var, &v)),
        None => Ok(None),
    }
}

/// CLI から渡す上書き（環境変数より優先）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub model_id: Option<String>,
    pub echo: bool,
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::stubs::MapEnv;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(&*s.region, "eu-west-1");
        assert_eq!(&*s.bucket, "boto3-bedrock-genai-project");
        assert_eq!(s.key_prefix, "blog-output/");
        assert_eq!(&*s.model_id, "eu.meta.llama3-2-3b-instruct-v1:0");
        assert_eq!(s.storage_timeout, Duration::from_secs(30));
        assert_eq!(s.read_timeout, Duration::from_secs(300));
        assert_eq!(s.max_retries, 3);
        assert_eq!(s.inference, InferenceKind::Bedrock);
    }

    #[test]
    fn test_resolve_without_env_is_default() {
        let s = Settings::resolve(&MapEnv::default(), &SettingsOverrides::default()).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_resolve_reads_env() {
        let env = MapEnv::from_pairs(&[
            (ENV_REGION, "us-east-1"),
            (ENV_BUCKET, "my-bucket"),
            (ENV_KEY_SUFFIX, "millis"),
            (ENV_TEMPERATURE, "0.2"),
            (ENV_MAX_GEN_LEN, "1024"),
            (ENV_READ_TIMEOUT_SECS, "30"),
            (ENV_MAX_RETRIES, "0"),
            (ENV_S3_ENDPOINT, "http://localhost:4566"),
            (ENV_INFERENCE, "echo"),
            (ENV_LOG_LEVEL, "warn"),
        ]);
        let s = Settings::resolve(&env, &SettingsOverrides::default()).unwrap();
        assert_eq!(&*s.region, "us-east-1");
        assert_eq!(&*s.bucket, "my-bucket");
        assert_eq!(s.key_suffix, KeySuffix::Millis);
        assert_eq!(s.completion.temperature, 0.2);
        assert_eq!(s.completion.top_p, 0.9);
        assert_eq!(s.completion.max_gen_len, 1024);
        assert_eq!(s.read_timeout, Duration::from_secs(30));
        assert_eq!(s.max_retries, 0);
        assert_eq!(s.s3_endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(s.bedrock_endpoint, None);
        assert_eq!(s.inference, InferenceKind::Echo);
        assert_eq!(s.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_overrides_win_over_env() {
        let env = MapEnv::from_pairs(&[(ENV_REGION, "us-east-1"), (ENV_MODEL_ID, "env-model")]);
        let overrides = SettingsOverrides {
            region: Some("ap-northeast-1".to_string()),
            model_id: Some("cli-model".to_string()),
            echo: true,
            verbose: true,
            ..Default::default()
        };
        let s = Settings::resolve(&env, &overrides).unwrap();
        assert_eq!(&*s.region, "ap-northeast-1");
        assert_eq!(&*s.model_id, "cli-model");
        assert_eq!(s.inference, InferenceKind::Echo);
        assert_eq!(s.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_values_are_usage_errors() {
        for (var, value) in [
            (ENV_MAX_RETRIES, "three"),
            (ENV_KEY_SUFFIX, "uuid"),
            (ENV_INFERENCE, "openai"),
            (ENV_LOG_LEVEL, "trace"),
            (ENV_TOP_P, "1.5"),
        ] {
            let env = MapEnv::from_pairs(&[(var, value)]);
            let err = Settings::resolve(&env, &SettingsOverrides::default()).unwrap_err();
            assert!(err.is_usage(), "{}", var);
            assert!(err.to_string().contains(var), "{}", err);
        }
    }

    #[test]
    fn test_inference_kind_parse() {
        assert_eq!(InferenceKind::parse("Echo"), Some(InferenceKind::Echo));
        assert_eq!(InferenceKind::parse("bedrock"), Some(InferenceKind::Bedrock));
        assert_eq!(InferenceKind::parse("openai"), None);
    }
}
