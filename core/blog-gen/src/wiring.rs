//! 配線: Settings から標準アダプタでハンドラを組み立てる

use std::sync::Arc;

use common::adapter::{JsonLineLog, LogSink};
use common::aws::RetryPolicy;
use common::ports::outbound::{Clock, EnvResolver, Log};

use crate::adapter::{BedrockRuntime, EchoInference, S3Store};
use crate::domain::{BlogCommand, InferenceKind, Settings};
use crate::ports::outbound::{InferenceEndpoint, ObjectStore};
use crate::usecase::completion::CompletionRequester;
use crate::usecase::handler::BlogHandler;
use crate::usecase::publish::ArtifactPublisher;

pub struct App {
    pub handler: BlogHandler,
    pub log: Arc<dyn Log>,
}

/// Lambda 上は stdout（CloudWatch）。1 回実行ではレスポンス JSON が stdout を使うので stderr
pub fn log_sink_for(command: &BlogCommand) -> LogSink {
    match command {
        BlogCommand::Invoke { .. } => LogSink::Stderr,
        BlogCommand::Serve | BlogCommand::Help => LogSink::Stdout,
    }
}

/// JSONL を書くロガー
pub fn wire_log(settings: &Settings, sink: LogSink) -> Arc<dyn Log> {
    Arc::new(JsonLineLog::to_sink(sink, settings.log_level))
}

pub fn wire_app(
    settings: Settings,
    env: Arc<dyn EnvResolver>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
) -> App {
    let retry = RetryPolicy::with_max_retries(settings.max_retries);
    let inference: Arc<dyn InferenceEndpoint> = match settings.inference {
        InferenceKind::Bedrock => Arc::new(BedrockRuntime::new(
            settings.region.clone(),
            settings.bedrock_endpoint.clone(),
            settings.read_timeout,
            retry,
            Arc::clone(&env),
            Arc::clone(&clock),
        )),
        InferenceKind::Echo => Arc::new(EchoInference::new()),
    };
    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::new(
        settings.region.clone(),
        settings.s3_endpoint.clone(),
        settings.storage_timeout,
        retry,
        env,
        Arc::clone(&clock),
    ));

    let completion = CompletionRequester::new(inference, settings.completion, Arc::clone(&log));
    let publisher = ArtifactPublisher::new(store, Arc::clone(&log));
    let handler = BlogHandler::new(settings, completion, publisher, clock, Arc::clone(&log));
    App { handler, log }
}
