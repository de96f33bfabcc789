//! S3 のエラーレスポンス (XML) から <Code> と <Message> を取り出す

use regex::Regex;
use std::sync::OnceLock;

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<Code>\s*([^<]+?)\s*</Code>").expect("valid regex"))
}

fn message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<Message>\s*(.*?)\s*</Message>").expect("valid regex"))
}

/// `(code, message)` を返す。<Code> が無ければ None（message は空文字になり得る）
pub fn parse_error_xml(body: &str) -> Option<(String, String)> {
    let code = code_re().captures(body)?.get(1)?.as_str().to_string();
    let message = message_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Some((code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_already_owned() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>BucketAlreadyOwnedByYou</Code><Message>Your previous request to create the named bucket succeeded and you already own it.</Message><BucketName>b</BucketName><RequestId>R</RequestId></Error>"#;
        let (code, message) = parse_error_xml(xml).unwrap();
        assert_eq!(code, "BucketAlreadyOwnedByYou");
        assert!(message.starts_with("Your previous request"));
    }

    #[test]
    fn test_parse_without_message() {
        let (code, message) = parse_error_xml("<Error><Code>NoSuchBucket</Code></Error>").unwrap();
        assert_eq!(code, "NoSuchBucket");
        assert_eq!(message, "");
    }

    #[test]
    fn test_parse_non_xml() {
        assert!(parse_error_xml("").is_none());
        assert!(parse_error_xml("Service Unavailable").is_none());
    }
}
