//! 呼び出しの入口: デコード → 生成 → 保存 → レスポンス
//!
//! 想定外の失敗（デコード失敗・panic）はすべて `error_response` で 500 に変換する。

use crate::domain::{
    blog_object_key, Generation, HandlerError, InvocationResponse, Settings,
};
use crate::ports::inbound::InvocationHandler;
use crate::usecase::completion::CompletionRequester;
use crate::usecase::decode::decode_request;
use crate::usecase::publish::ArtifactPublisher;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// ハンドラ境界のエラーを外部レスポンスに変換する
pub fn error_response(err: &HandlerError) -> InvocationResponse {
    InvocationResponse::internal_error(&err.to_string())
}

pub struct BlogHandler {
    settings: Settings,
    completion: CompletionRequester,
    publisher: ArtifactPublisher,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
}

impl BlogHandler {
    pub fn new(
        settings: Settings,
        completion: CompletionRequester,
        publisher: ArtifactPublisher,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            settings,
            completion,
            publisher,
            clock,
            log,
        }
    }

    /// テスト用: 配線された設定
    #[allow(dead_code)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn try_handle(&self, event: &Value) -> Result<InvocationResponse, HandlerError> {
        let topic = decode_request(event)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "blog requested")
                .layer("usecase")
                .kind("request")
                .field("topic", &*topic),
        );

        let generation = self.completion.request(&topic, &self.settings.model_id);
        let text = match &generation {
            Generation::Text(t) => t,
            Generation::Empty | Generation::Failed { .. } => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Warn, "No blog was generated")
                        .layer("usecase")
                        .kind("generate")
                        .field("outcome", generation.label()),
                );
                return Ok(InvocationResponse::generation_failed());
            }
        };

        // キーは書き込み直前の時刻で決める
        let key = blog_object_key(
            &self.settings.key_prefix,
            &self.clock.now_local(),
            self.settings.key_suffix,
        );
        let saved = self.publisher.publish(
            &self.settings.bucket,
            &key,
            text,
            &self.settings.region,
        );
        if !saved {
            return Ok(InvocationResponse::save_failed());
        }
        Ok(InvocationResponse::success())
    }
}

impl InvocationHandler for BlogHandler {
    fn handle(&self, event: &Value) -> InvocationResponse {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_handle(event)))
            .unwrap_or_else(|payload| Err(HandlerError::Panic(panic_message(payload.as_ref()))));
        match outcome {
            Ok(resp) => resp,
            Err(e) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Error, format!("Invocation failed: {}", e))
                        .layer("usecase")
                        .kind("error"),
                );
                error_response(&e)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
