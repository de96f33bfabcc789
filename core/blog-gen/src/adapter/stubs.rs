//! テスト用: ポートの Stub / Fake 実装（ネットワークに出ない）

#[cfg(test)]
mod stub {
    use crate::domain::{Invocation, RuntimeError};
    use crate::ports::outbound::{InferenceEndpoint, ObjectStore, RuntimeApi};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use common::domain::{BucketName, ModelId, ObjectKey, Region};
    use common::error::Error;
    use common::ports::outbound::{Clock, EnvResolver, Log, LogLevel, LogRecord};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// 固定マップを返す EnvResolver
    #[derive(Debug, Default)]
    pub struct MapEnv {
        vars: HashMap<String, String>,
    }

    impl MapEnv {
        pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
            Self {
                vars: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl EnvResolver for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.vars.get(key).filter(|v| !v.is_empty()).cloned()
        }
    }

    /// 常に同じ時刻を返す Clock（UTC とローカルは同じ値）
    pub struct FixedClock {
        at: NaiveDateTime,
    }

    impl FixedClock {
        pub fn new(at: NaiveDateTime) -> Self {
            Self { at }
        }

        /// 2026-02-07 の h:m:s
        pub fn at_hms(h: u32, m: u32, s: u32) -> Self {
            Self::at_hms_milli(h, m, s, 0)
        }

        pub fn at_hms_milli(h: u32, m: u32, s: u32, ms: u32) -> Self {
            let at = NaiveDate::from_ymd_opt(2026, 2, 7)
                .and_then(|d| d.and_hms_milli_opt(h, m, s, ms))
                .expect("valid test time");
            Self::new(at)
        }
    }

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            Utc.from_utc_datetime(&self.at)
        }

        fn now_local(&self) -> NaiveDateTime {
            self.at
        }
    }

    /// レコードをメモリに溜める Log
    #[derive(Default)]
    pub struct MemoryLog {
        records: Mutex<Vec<LogRecord>>,
    }

    impl MemoryLog {
        pub fn records(&self) -> Vec<LogRecord> {
            self.records.lock().unwrap().clone()
        }

        pub fn count_at(&self, level: LogLevel) -> usize {
            self.records().iter().filter(|r| r.level == level).count()
        }

        pub fn has_kind(&self, kind: &str) -> bool {
            self.records()
                .iter()
                .any(|r| r.kind.as_deref() == Some(kind))
        }
    }

    impl Log for MemoryLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    /// 固定の結果を返す InferenceEndpoint。呼び出し（モデル ID とボディ）を記録する
    pub struct StubInference {
        result: Result<String, Error>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubInference {
        pub fn new(result: Result<String, Error>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// `{"generation": text}` を返す
        pub fn generation(text: &str) -> Self {
            Self::new(Ok(serde_json::json!({
                "generation": text,
                "prompt_token_count": 42,
                "generation_token_count": 7,
                "stop_reason": "stop"
            })
            .to_string()))
        }

        pub fn failing(err: Error) -> Self {
            Self::new(Err(err))
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InferenceEndpoint for StubInference {
        fn name(&self) -> &str {
            "stub"
        }

        fn invoke_model(&self, model_id: &ModelId, body: &str) -> Result<String, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((model_id.to_string(), body.to_string()));
            self.result.clone()
        }
    }

    /// 結果を設定できる ObjectStore。書き込まれたオブジェクトを記録する
    #[derive(Default)]
    pub struct FakeObjectStore {
        create_error: Option<Error>,
        put_error: Option<Error>,
        created: Mutex<Vec<(String, String)>>,
        objects: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    impl FakeObjectStore {
        pub fn accepting() -> Self {
            Self::default()
        }

        /// CreateBucket が AWS エラー `code` を返す
        pub fn create_fails_with(code: &str) -> Self {
            Self {
                create_error: Some(Error::aws(code, "simulated")),
                ..Self::default()
            }
        }

        pub fn put_fails_with(err: Error) -> Self {
            Self {
                put_error: Some(err),
                ..Self::default()
            }
        }

        /// (bucket, region)
        pub fn created(&self) -> Vec<(String, String)> {
            self.created.lock().unwrap().clone()
        }

        /// (bucket, key, body)
        pub fn objects(&self) -> Vec<(String, String, Vec<u8>)> {
            self.objects.lock().unwrap().clone()
        }
    }

    impl ObjectStore for FakeObjectStore {
        fn create_bucket(&self, bucket: &BucketName, region: &Region) -> Result<(), Error> {
            self.created
                .lock()
                .unwrap()
                .push((bucket.to_string(), region.to_string()));
            match &self.create_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        fn put_object(&self, bucket: &BucketName, key: &ObjectKey, body: &[u8]) -> Result<(), Error> {
            if let Some(e) = &self.put_error {
                return Err(e.clone());
            }
            self.objects
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string(), body.to_vec()));
            Ok(())
        }
    }

    /// 用意した呼び出しを順に返す RuntimeApi。尽きたら Http エラー
    #[derive(Default)]
    pub struct FakeRuntimeApi {
        pending: Mutex<VecDeque<Result<Invocation, Error>>>,
        responses: Mutex<Vec<(String, String)>>,
        errors: Mutex<Vec<(String, RuntimeError)>>,
        init_errors: Mutex<Vec<RuntimeError>>,
        fail_responses: bool,
    }

    impl FakeRuntimeApi {
        pub fn with_events(events: Vec<serde_json::Value>) -> Self {
            let pending = events
                .into_iter()
                .enumerate()
                .map(|(i, ev)| Ok(Invocation::new(format!("req-{}", i + 1), ev)))
                .collect();
            Self {
                pending: Mutex::new(pending),
                ..Self::default()
            }
        }

        pub fn push(&self, next: Result<Invocation, Error>) {
            self.pending.lock().unwrap().push_back(next);
        }

        /// send_response が常に失敗する
        pub fn rejecting_responses(mut self) -> Self {
            self.fail_responses = true;
            self
        }

        pub fn responses(&self) -> Vec<(String, String)> {
            self.responses.lock().unwrap().clone()
        }

        pub fn errors(&self) -> Vec<(String, RuntimeError)> {
            self.errors.lock().unwrap().clone()
        }

        pub fn init_errors(&self) -> Vec<RuntimeError> {
            self.init_errors.lock().unwrap().clone()
        }
    }

    impl RuntimeApi for FakeRuntimeApi {
        fn next_invocation(&self) -> Result<Invocation, Error> {
            self.pending
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::http("no more invocations")))
        }

        fn send_response(&self, request_id: &str, body: &str) -> Result<(), Error> {
            if self.fail_responses {
                return Err(Error::http("response rejected"));
            }
            self.responses
                .lock()
                .unwrap()
                .push((request_id.to_string(), body.to_string()));
            Ok(())
        }

        fn send_invocation_error(&self, request_id: &str, error: &RuntimeError) -> Result<(), Error> {
            self.errors
                .lock()
                .unwrap()
                .push((request_id.to_string(), error.clone()));
            Ok(())
        }

        fn send_init_error(&self, error: &RuntimeError) -> Result<(), Error> {
            self.init_errors.lock().unwrap().push(error.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
pub use stub::{FakeObjectStore, FakeRuntimeApi, FixedClock, MapEnv, MemoryLog, StubInference};
