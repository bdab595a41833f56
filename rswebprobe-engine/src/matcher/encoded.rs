//! 编码形式匹配：base64 / hex / URL 百分号编码
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// 生成模式的三种编码形式，空串与重复项被过滤
pub fn encoded_forms(pattern: &str) -> Vec<String> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let mut forms = vec![
        BASE64.encode(pattern.as_bytes()),
        hex::encode(pattern.as_bytes()),
        encode_uri_component(pattern),
    ];
    forms.dedup();
    forms
}

/// 与浏览器 encodeURIComponent 一致：额外保留 ! ' ( ) *
pub fn encode_uri_component(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}
