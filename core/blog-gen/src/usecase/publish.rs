//! 生成した本文をオブジェクトストレージに保存する
//!
//! どの操作も Err を返さず bool で成否を返す。失敗はすべてログに残す。

use crate::ports::outbound::{ObjectStore, BUCKET_ALREADY_EXISTS, BUCKET_ALREADY_OWNED_BY_YOU};
use common::domain::{BucketName, ObjectKey, Region};
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
    log: Arc<dyn Log>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, log: Arc<dyn Log>) -> Self {
        Self { store, log }
    }

    fn record(&self, level: LogLevel, message: String, bucket: &BucketName) -> LogRecord {
        LogRecord::new(level, message)
            .layer("usecase")
            .kind("publish")
            .field("bucket", &**bucket)
    }

    /// バケットを作成する。自分の所有で既に存在する場合も true
    pub fn ensure_bucket(&self, bucket: &BucketName, region: &Region) -> bool {
        match self.store.create_bucket(bucket, region) {
            Ok(()) => {
                let _ = self.log.log(
                    &self
                        .record(LogLevel::Info, format!("Bucket '{}' created", bucket), bucket)
                        .field("region", &**region),
                );
                true
            }
            Err(e) => match e.aws_code() {
                Some(BUCKET_ALREADY_OWNED_BY_YOU) => {
                    let _ = self.log.log(&self.record(
                        LogLevel::Debug,
                        format!("Bucket '{}' already exists and is owned by you", bucket),
                        bucket,
                    ));
                    true
                }
                Some(BUCKET_ALREADY_EXISTS) => {
                    let _ = self.log.log(&self.record(
                        LogLevel::Error,
                        format!("Bucket '{}' already exists and is owned by someone else", bucket),
                        bucket,
                    ));
                    false
                }
                _ => {
                    let _ = self.log.log(
                        &self
                            .record(LogLevel::Error, format!("Error creating bucket: {}", e), bucket)
                            .field("region", &**region),
                    );
                    false
                }
            },
        }
    }

    pub fn write_object(&self, bucket: &BucketName, key: &ObjectKey, text: &str) -> bool {
        match self.store.put_object(bucket, key, text.as_bytes()) {
            Ok(()) => {
                let _ = self.log.log(
                    &self
                        .record(LogLevel::Info, "Blog saved".to_string(), bucket)
                        .field("key", &**key)
                        .field("bytes", text.len()),
                );
                true
            }
            Err(e) => {
                let _ = self.log.log(
                    &self
                        .record(LogLevel::Error, format!("Error saving the blog: {}", e), bucket)
                        .field("key", &**key),
                );
                false
            }
        }
    }

    /// ensure_bucket が成功したときだけ書き込む
    pub fn publish(&self, bucket: &BucketName, key: &ObjectKey, text: &str, region: &Region) -> bool {
        if !self.ensure_bucket(bucket, region) {
            let _ = self.log.log(&self.record(
                LogLevel::Error,
                "Cannot proceed without a valid bucket".to_string(),
                bucket,
            ));
            return false;
        }
        self.write_object(bucket, key, text)
    }
}
