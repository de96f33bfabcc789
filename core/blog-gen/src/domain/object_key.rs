//! オブジェクトキーの生成（ローカル壁時計の HHMMSS）
//!
//! 同じ秒に書き込んだ呼び出し同士はキーが衝突する。KeySuffix::Millis でミリ秒を付ければ窓は 1ms になる。

use chrono::NaiveDateTime;
use common::domain::ObjectKey;

/// ファイル名の後ろに付ける一意化サフィックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySuffix {
    /// blog-output/HHMMSS.txt
    #[default]
    None,
    /// blog-output/HHMMSS-mmm.txt
    Millis,
}

impl KeySuffix {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "millis" | "ms" => Some(Self::Millis),
            _ => None,
        }
    }
}

/// 6 桁の時分秒（例: 09:05:07 → "090507"）
pub fn timestamp_hhmmss(now: &NaiveDateTime) -> String {
    now.format("%H%M%S").to_string()
}

/// `{prefix}{HHMMSS}[-mmm].txt`
pub fn blog_object_key(prefix: &str, now: &NaiveDateTime, suffix: KeySuffix) -> ObjectKey {
    let stem = match suffix {
        KeySuffix::None => timestamp_hhmmss(now),
        KeySuffix::Millis => now.format("%H%M%S-%3f").to_string(),
    };
    ObjectKey::new(format!("{}{}.txt", prefix, stem))
}
