//! 签名归一化：原始模式值 → 模式描述体列表
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{split_tags, Channel, ExplicitPattern, PatternDescriptor, PatternItem, PatternType, RawPattern};

/// 含正则元字符即视为正则
static REGEX_META: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.*+?^${}()|\[\]\\]").unwrap());

/// 连续两位以上数字，或 大写串-小写串-大写串 的驼峰形状
static FUZZY_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{2,}|[A-Z]{2,}[a-z]{2,}[A-Z]{2,}").unwrap());

pub struct SignatureNormalizer;

impl SignatureNormalizer {
    /// 参数：
    /// - raw: 字符串 / 显式对象 / 列表
    /// - channel: 来源通道，决定默认置信度与优先级
    /// 返回：按声明顺序排列的描述体
    pub fn normalize(raw: &RawPattern, channel: Channel) -> Vec<PatternDescriptor> {
        match raw {
            RawPattern::Literal(s) => vec![Self::literal(s, channel)],
            RawPattern::Explicit(p) => vec![Self::explicit(p, channel)],
            RawPattern::Patterns(items) => items
                .iter()
                .map(|item| match item {
                    PatternItem::Literal(s) => Self::literal(s, channel),
                    PatternItem::Explicit(p) => Self::explicit(p, channel),
                })
                .collect(),
        }
    }

    /// 裸字符串：去标签后按默认表补齐，类型靠推断
    pub fn literal(raw: &str, channel: Channel) -> PatternDescriptor {
        let (pattern, version_template) = split_tags(raw);
        let pattern_type = Self::infer_type(&pattern);
        let mut descriptor = PatternDescriptor::new(
            pattern,
            pattern_type,
            channel.default_confidence(),
            channel.default_priority(),
            channel,
        );
        descriptor.version_template = version_template;
        descriptor
    }

    /// 显式对象原样保留，仅补齐缺省字段
    pub fn explicit(p: &ExplicitPattern, channel: Channel) -> PatternDescriptor {
        let (pattern, tag_version) = split_tags(&p.pattern);
        let pattern_type = p.pattern_type.unwrap_or_else(|| Self::infer_type(&pattern));
        let mut descriptor = PatternDescriptor::new(
            pattern,
            pattern_type,
            p.confidence.unwrap_or_else(|| channel.default_confidence()).clamp(0.0, 100.0),
            p.priority.unwrap_or_else(|| channel.default_priority()),
            p.location.unwrap_or(channel),
        );
        descriptor.version_template = p.version.clone().or(tag_version);
        descriptor
    }

    /// 正则元字符 → regex；数字串/驼峰形状 → fuzzy；其余 exact
    pub fn infer_type(pattern: &str) -> PatternType {
        if REGEX_META.is_match(pattern) {
            PatternType::Regex
        } else if FUZZY_SHAPE.is_match(pattern) {
            PatternType::Fuzzy
        } else {
            PatternType::Exact
        }
    }
}
