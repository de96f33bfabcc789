//! Lambda custom runtime のイベントループ
//!
//! next → handle → response を繰り返す。ハンドラは失敗もレスポンスとして返すので、
//! /error に送るのはレスポンスをシリアライズできなかった場合だけ。

use crate::domain::RuntimeError;
use crate::ports::inbound::InvocationHandler;
use crate::ports::outbound::RuntimeApi;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};

/// `max_invocations` が Some(n) なら n 件処理して戻る（None なら next が失敗するまで）
///
/// 戻り値は処理した呼び出しの数。
pub fn run_runtime_loop(
    api: &dyn RuntimeApi,
    handler: &dyn InvocationHandler,
    log: &dyn Log,
    max_invocations: Option<usize>,
) -> Result<usize, Error> {
    let mut handled = 0;
    while max_invocations.map_or(true, |max| handled < max) {
        let invocation = match api.next_invocation() {
            Ok(inv) => inv,
            Err(e) => {
                let _ = log.log(
                    &LogRecord::new(LogLevel::Error, format!("Failed to fetch next invocation: {}", e))
                        .layer("runtime")
                        .kind("lifecycle"),
                );
                return Err(e);
            }
        };
        let request_id = invocation.request_id.clone();
        let mut start = LogRecord::new(LogLevel::Debug, "invocation started")
            .layer("runtime")
            .kind("lifecycle")
            .field("request_id", request_id.as_str());
        if let Some(deadline) = invocation.deadline_ms {
            start = start.field("deadline_ms", deadline);
        }
        if let Some(trace) = &invocation.trace_id {
            start = start.field("trace_id", trace.as_str());
        }
        let _ = log.log(&start);

        let response = handler.handle(&invocation.event);
        let sent = match serde_json::to_string(&response) {
            Ok(body) => api.send_response(&request_id, &body),
            Err(e) => api.send_invocation_error(
                &request_id,
                &RuntimeError::new("Runtime.SerializationError", e.to_string()),
            ),
        };
        if let Err(e) = sent {
            let _ = log.log(
                &LogRecord::new(LogLevel::Error, format!("Failed to post invocation result: {}", e))
                    .layer("runtime")
                    .kind("lifecycle")
                    .field("request_id", request_id.as_str()),
            );
        }

        let _ = log.log(
            &LogRecord::new(LogLevel::Info, "invocation finished")
                .layer("runtime")
                .kind("lifecycle")
                .field("request_id", request_id.as_str())
                .field("status_code", response.status_code),
        );
        handled += 1;
    }
    Ok(handled)
}
