use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::CoreError;

/// 模式优先级，决定基础置信度的乘数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// 优先级权重：HIGH 1.0 / MEDIUM 0.7 / LOW 0.4
    #[inline(always)]
    pub const fn weight(self) -> f64 {
        match self {
            Priority::High => 1.0,
            Priority::Medium => 0.7,
            Priority::Low => 0.4,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// 模式匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// 大小写不敏感子串包含
    Exact,
    /// 大小写不敏感正则，编译失败回退为 Exact
    Regex,
    /// 去噪后包含 或 Levenshtein 相似度 > 0.7
    Fuzzy,
    /// base64 / hex / URL 编码后的字面包含
    Encoded,
}

impl Display for PatternType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Exact => write!(f, "exact"),
            PatternType::Regex => write!(f, "regex"),
            PatternType::Fuzzy => write!(f, "fuzzy"),
            PatternType::Encoded => write!(f, "encoded"),
        }
    }
}

/// 证据通道，同时作为模式的来源位置标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Js,
    ScriptSrc,
    Headers,
    Cookies,
    Html,
    Dom,
    Meta,
}

impl Channel {
    /// 检测时的通道遍历顺序
    pub const ALL: [Channel; 7] = [
        Channel::Js,
        Channel::ScriptSrc,
        Channel::Headers,
        Channel::Cookies,
        Channel::Html,
        Channel::Dom,
        Channel::Meta,
    ];

    /// 裸字符串模式的默认基础置信度
    pub const fn default_confidence(self) -> f64 {
        match self {
            Channel::Headers => 80.0,
            Channel::Cookies => 85.0,
            Channel::ScriptSrc => 70.0,
            Channel::Js => 60.0,
            Channel::Dom => 65.0,
            Channel::Html => 40.0,
            Channel::Meta => 50.0,
        }
    }

    /// 裸字符串模式的默认优先级
    pub const fn default_priority(self) -> Priority {
        match self {
            Channel::Headers | Channel::Cookies => Priority::High,
            Channel::Meta => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Js => "js",
            Channel::ScriptSrc => "scriptSrc",
            Channel::Headers => "headers",
            Channel::Cookies => "cookies",
            Channel::Html => "html",
            Channel::Dom => "dom",
            Channel::Meta => "meta",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 置信度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    None,
}

impl ConfidenceLevel {
    /// HIGH ≥80, MEDIUM ≥60, LOW ≥40, 其余 NONE
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            ConfidenceLevel::High
        } else if confidence >= 60.0 {
            ConfidenceLevel::Medium
        } else if confidence >= 40.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::None
        }
    }
}

/// 检测模式，决定直接检出的最低置信度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetectionMode {
    Strict,
    #[default]
    Normal,
    Loose,
}

impl DetectionMode {
    #[inline(always)]
    pub const fn threshold(self) -> f64 {
        match self {
            DetectionMode::Strict => 80.0,
            DetectionMode::Normal => 60.0,
            DetectionMode::Loose => 40.0,
        }
    }
}

impl FromStr for DetectionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRICT" => Ok(DetectionMode::Strict),
            "NORMAL" => Ok(DetectionMode::Normal),
            "LOOSE" => Ok(DetectionMode::Loose),
            other => Err(CoreError::InvalidInput(format!(
                "unknown detection mode: {}",
                other
            ))),
        }
    }
}

impl Display for DetectionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMode::Strict => write!(f, "STRICT"),
            DetectionMode::Normal => write!(f, "NORMAL"),
            DetectionMode::Loose => write!(f, "LOOSE"),
        }
    }
}
