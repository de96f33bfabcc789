//! 受信イベントからトピックを取り出す
//!
//! API Gateway プロキシ形式: `{"body": "{\"blog_topic\": \"...\"}"}`。
//! `isBase64Encoded: true` のときは body を base64 デコードしてから JSON として読む。

use crate::domain::{BlogTopic, HandlerError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

pub fn decode_request(event: &Value) -> Result<BlogTopic, HandlerError> {
    let body = event.get("body").ok_or(HandlerError::MissingBody)?;
    let body = body.as_str().ok_or(HandlerError::BodyNotString)?;

    let is_base64 = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let decoded;
    let json_text = if is_base64 {
        let bytes = STANDARD
            .decode(body.trim())
            .map_err(|e| HandlerError::InvalidBase64(e.to_string()))?;
        decoded = String::from_utf8(bytes).map_err(|e| HandlerError::InvalidBase64(e.to_string()))?;
        decoded.as_str()
    } else {
        body
    };

    let request: Value =
        serde_json::from_str(json_text).map_err(|e| HandlerError::InvalidJson(e.to_string()))?;
    // キーがあれば型は問わない。文字列以外は JSON 表記をそのままトピックにする
    match request.get("blog_topic") {
        Some(Value::String(s)) => Ok(BlogTopic::new(s.as_str())),
        Some(other) => Ok(BlogTopic::new(other.to_string())),
        None => Err(HandlerError::MissingTopic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_topic_unchanged() {
        let event = json!({"body": "{\"blog_topic\": \"  Cats & Dogs \"}"});
        assert_eq!(&*decode_request(&event).unwrap(), "  Cats & Dogs ");
    }

    #[test]
    fn test_empty_topic_is_accepted() {
        let event = json!({"body": "{\"blog_topic\": \"\"}"});
        assert_eq!(&*decode_request(&event).unwrap(), "");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let event = json!({
            "resource": "/blog",
            "httpMethod": "POST",
            "body": "{\"blog_topic\": \"cats\", \"tone\": \"casual\"}"
        });
        assert_eq!(&*decode_request(&event).unwrap(), "cats");
    }

    #[test]
    fn test_base64_body() {
        let encoded = STANDARD.encode("{\"blog_topic\":\"rust\"}");
        let event = json!({"body": encoded, "isBase64Encoded": true});
        assert_eq!(&*decode_request(&event).unwrap(), "rust");
    }

    #[test]
    fn test_base64_flag_false_reads_body_as_is() {
        let event = json!({"body": "{\"blog_topic\":\"rust\"}", "isBase64Encoded": false});
        assert_eq!(&*decode_request(&event).unwrap(), "rust");
    }

    #[test]
    fn test_non_string_topic_is_used_as_json_text() {
        let event = json!({"body": "{\"blog_topic\": 7}"});
        assert_eq!(&*decode_request(&event).unwrap(), "7");
        let event = json!({"body": "{\"blog_topic\": null}"});
        assert_eq!(&*decode_request(&event).unwrap(), "null");
        let event = json!({"body": "{\"blog_topic\": [\"cats\"]}"});
        assert_eq!(&*decode_request(&event).unwrap(), "[\"cats\"]");
    }

    #[test]
    fn test_failures() {
        assert_eq!(decode_request(&json!({})), Err(HandlerError::MissingBody));
        assert_eq!(decode_request(&json!({"body": null})), Err(HandlerError::BodyNotString));
        assert_eq!(
            decode_request(&json!({"body": {"blog_topic": "cats"}})),
            Err(HandlerError::BodyNotString)
        );
        assert!(matches!(
            decode_request(&json!({"body": "not json"})),
            Err(HandlerError::InvalidJson(_))
        ));
        assert_eq!(
            decode_request(&json!({"body": "{\"topic\": \"cats\"}"})),
            Err(HandlerError::MissingTopic)
        );
        assert!(matches!(
            decode_request(&json!({"body": "%%%", "isBase64Encoded": true})),
            Err(HandlerError::InvalidBase64(_))
        ));
    }
}
