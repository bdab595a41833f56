//! 模式描述体与原始签名模式
use serde::{Deserialize, Serialize};

use super::enums::{Channel, PatternType, Priority};

/// Wappalyzer 标签分隔符，如 `nginx(?:/([\d.]+))?\;version:\1`
const TAG_SEPARATOR: &str = "\\;";

/// 归一化后的单条规则单元
/// 检测期按次创建，匹配成功后填充 matched_values / version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDescriptor {
    pub pattern: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// 基础置信度 0-100
    pub confidence: f64,
    pub location: Channel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 版本模板（\1 / $1），仅运行期使用
    #[serde(skip)]
    pub version_template: Option<String>,
}

impl PatternDescriptor {
    pub fn new(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        confidence: f64,
        priority: Priority,
        location: Channel,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            priority,
            pattern_type,
            confidence,
            location,
            matched_values: Vec::new(),
            version: None,
            version_template: None,
        }
    }

    /// 命中时贡献的置信度 = 基础置信度 × 优先级权重
    #[inline(always)]
    pub fn weighted_confidence(&self) -> f64 {
        self.confidence * self.priority.weight()
    }

    /// 生成一条命中记录（克隆描述体并写入匹配值）
    pub fn to_match(&self, matched_values: Vec<String>, version: Option<String>) -> Self {
        let mut hit = self.clone();
        hit.matched_values = matched_values;
        hit.version = version;
        hit
    }
}

/// 签名中显式声明的模式对象，缺省字段由通道默认表补齐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitPattern {
    pub pattern: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, rename = "type")]
    pub pattern_type: Option<PatternType>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub location: Option<Channel>,
    #[serde(default)]
    pub version: Option<String>,
}

/// 列表中的单个模式项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternItem {
    Literal(String),
    Explicit(ExplicitPattern),
}

/// 签名中的原始模式值：字符串 / 显式对象 / 列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPattern {
    Literal(String),
    Explicit(ExplicitPattern),
    Patterns(Vec<PatternItem>),
}

impl RawPattern {
    /// 展开为模式项列表
    pub fn items(&self) -> Vec<PatternItem> {
        match self {
            RawPattern::Literal(s) => vec![PatternItem::Literal(s.clone())],
            RawPattern::Explicit(p) => vec![PatternItem::Explicit(p.clone())],
            RawPattern::Patterns(list) => list.clone(),
        }
    }

    /// 是否为空模式（空字符串或空列表），空值表示"存在即命中"
    pub fn is_empty(&self) -> bool {
        match self {
            RawPattern::Literal(s) => split_tags(s).0.is_empty(),
            RawPattern::Explicit(p) => p.pattern.is_empty(),
            RawPattern::Patterns(list) => list.is_empty(),
        }
    }
}

impl Default for RawPattern {
    fn default() -> Self {
        RawPattern::Literal(String::new())
    }
}

impl From<&str> for RawPattern {
    fn from(s: &str) -> Self {
        RawPattern::Literal(s.to_string())
    }
}

/// 拆分 Wappalyzer 标签
/// 返回：(去标签后的模式, version 模板)；confidence 等其余标签忽略
pub fn split_tags(raw: &str) -> (String, Option<String>) {
    let mut parts = raw.split(TAG_SEPARATOR);
    let pattern = parts.next().unwrap_or_default().to_string();
    let mut version = None;

    for tag in parts {
        if let Some(tpl) = tag.strip_prefix("version:") {
            let tpl = tpl.trim();
            if !tpl.is_empty() {
                version = Some(tpl.to_string());
            }
        }
    }

    (pattern, version)
}

/// 技术引用去标签（implies/requires 中的 `PHP\;confidence:50`）
pub fn strip_reference(raw: &str) -> String {
    split_tags(raw).0.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags_version() {
        let (p, v) = split_tags(r"nginx(?:/([\d.]+))?\;version:\1");
        assert_eq!(p, r"nginx(?:/([\d.]+))?");
        assert_eq!(v.as_deref(), Some(r"\1"));
    }

    #[test]
    fn test_split_tags_ignores_other_tags() {
        let (p, v) = split_tags(r"jquery\;confidence:50");
        assert_eq!(p, "jquery");
        assert!(v.is_none());
        assert_eq!(strip_reference(r"PHP\;confidence:50"), "PHP");
    }

    #[test]
    fn test_raw_pattern_untagged_shapes() {
        let lit: RawPattern = serde_json::from_str(r#""wp-content""#).unwrap();
        assert_eq!(lit, RawPattern::Literal("wp-content".into()));

        let explicit: RawPattern =
            serde_json::from_str(r#"{"pattern":"x","type":"encoded","priority":"LOW"}"#).unwrap();
        match explicit {
            RawPattern::Explicit(p) => {
                assert_eq!(p.pattern_type, Some(PatternType::Encoded));
                assert_eq!(p.priority, Some(Priority::Low));
                assert!(p.confidence.is_none());
            }
            other => panic!("unexpected shape: {:?}", other),
        }

        let list: RawPattern = serde_json::from_str(r#"["a", {"pattern":"b"}]"#).unwrap();
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_weighted_confidence() {
        let d = PatternDescriptor::new("x", PatternType::Exact, 80.0, Priority::Medium, Channel::Js);
        assert!((d.weighted_confidence() - 56.0).abs() < 1e-9);
        assert!(RawPattern::default().is_empty());
    }
}
