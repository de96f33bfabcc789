//! トピックからブログ本文を生成する
//!
//! 失敗はすべてログに残して `Generation::Failed` にする（この境界より外へ Err を出さない）。

use crate::domain::{BlogTopic, CompletionParams, Generation, NativeRequest, Prompt};
use crate::ports::outbound::InferenceEndpoint;
use common::domain::ModelId;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use serde_json::Value;
use std::sync::Arc;

pub struct CompletionRequester {
    endpoint: Arc<dyn InferenceEndpoint>,
    params: CompletionParams,
    log: Arc<dyn Log>,
}

impl CompletionRequester {
    pub fn new(endpoint: Arc<dyn InferenceEndpoint>, params: CompletionParams, log: Arc<dyn Log>) -> Self {
        Self {
            endpoint,
            params,
            log,
        }
    }

    pub fn request(&self, topic: &BlogTopic, model_id: &ModelId) -> Generation {
        let prompt = Prompt::for_model(model_id, topic);
        let body = match serde_json::to_string(&NativeRequest::new(&prompt, &self.params)) {
            Ok(b) => b,
            Err(e) => return self.fail(model_id, format!("Failed to encode request: {}", e)),
        };

        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "invoking model")
                .layer("usecase")
                .kind("generate")
                .field("endpoint", self.endpoint.name())
                .field("model_id", &**model_id)
                .field("prompt_len", prompt.len()),
        );

        let raw = match self.endpoint.invoke_model(model_id, &body) {
            Ok(r) => r,
            Err(e) => return self.fail(model_id, e.to_string()),
        };
        let response: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => return self.fail(model_id, format!("Malformed model response: {}", e)),
        };
        let text = match response.get("generation").and_then(Value::as_str) {
            Some(t) => t,
            None => return self.fail(model_id, "Model response has no 'generation' string".to_string()),
        };

        let generation = Generation::from_text(text);
        let level = match generation {
            Generation::Empty => LogLevel::Warn,
            _ => LogLevel::Info,
        };
        let _ = self.log.log(
            &LogRecord::new(level, format!("generation {}", generation.label()))
                .layer("usecase")
                .kind("generate")
                .field("model_id", &**model_id)
                .field("chars", text.chars().count())
                .field("stop_reason", response.get("stop_reason").cloned().unwrap_or(Value::Null)),
        );
        generation
    }

    fn fail(&self, model_id: &ModelId, reason: String) -> Generation {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Error, format!("Error generating the blog: {}", reason))
                .layer("usecase")
                .kind("generate")
                .field("endpoint", self.endpoint.name())
                .field("model_id", &**model_id),
        );
        Generation::failed(reason)
    }
}
