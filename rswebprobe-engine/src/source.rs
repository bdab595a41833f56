//! 签名源解析
//! 兼容裸 `{name: signature}` 与 `{"technologies"|"apps": {...}}` 两种外层结构
use serde_json::{Map, Value};

use crate::core::{Signature, SignatureLibrary};
use crate::error::{CoreError, CoreResult};

/// 宽松解析的产物：签名库 + 被跳过的技术名
#[derive(Debug, Clone, Default)]
pub struct ParsedSignatures {
    pub library: SignatureLibrary,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignatureParser;

impl SignatureParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str(&self, content: &str) -> CoreResult<ParsedSignatures> {
        let value: Value = serde_json::from_str(content)?;
        self.parse_value(value)
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> CoreResult<ParsedSignatures> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.parse_value(value)
    }

    /// 单个技术结构非法时告警并跳过，其余照常加载；顶层非对象直接报错
    pub fn parse_value(&self, value: Value) -> CoreResult<ParsedSignatures> {
        let technologies = Self::unwrap_root(value)?;
        let mut parsed = ParsedSignatures::default();

        for (name, raw) in technologies {
            let name = name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            match serde_json::from_value::<Signature>(raw) {
                Ok(signature) => {
                    parsed.library.insert(name, signature);
                }
                Err(e) => {
                    log::warn!("Skipping malformed signature: tech={} error={}", name, e);
                    parsed.skipped.push(name);
                }
            }
        }

        Ok(parsed)
    }

    fn unwrap_root(value: Value) -> CoreResult<Map<String, Value>> {
        let Value::Object(mut root) = value else {
            return Err(CoreError::SignatureParseError(
                "top-level signature data must be a JSON object".to_string(),
            ));
        };

        for key in ["technologies", "apps"] {
            if matches!(root.get(key), Some(Value::Object(_))) {
                if let Some(Value::Object(inner)) = root.remove(key) {
                    return Ok(inner);
                }
            }
        }
        Ok(root)
    }
}
