use regex::{Regex, RegexBuilder};

use super::encoded::encoded_forms;
use super::fuzzy::{clean_fuzzy, fuzzy_match};
use crate::core::{PatternDescriptor, PatternType};
use crate::utils::VersionExtractor;

/// 单次匹配最多记录的匹配值数量
pub const MAX_MATCHED_VALUES: usize = 16;

/// 单条模式在单个值上的匹配结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub matched: bool,
    pub confidence: f64,
    pub matched_values: Vec<String>,
    pub version: Option<String>,
}

impl MatchOutcome {
    #[inline(always)]
    pub fn miss() -> Self {
        Self::default()
    }
}

/// 运行时匹配器，全部正则在构建期编译
#[derive(Debug, Clone)]
enum MatcherKind {
    /// 字面量的转义正则，保证大小写不敏感时仍能取回原文片段
    Literal(Regex),
    /// 转义正则构建失败（超限）时的兜底：小写包含
    LoweredContains(String),
    Regex(Regex),
    Fuzzy(String),
    Encoded(Vec<String>),
}

/// 预编译模式：归一化描述体 + 运行时匹配器
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    descriptor: PatternDescriptor,
    kind: MatcherKind,
    case_insensitive: bool,
}

impl CompiledPattern {
    /// 大小写不敏感编译（默认语义）
    pub fn compile(descriptor: PatternDescriptor) -> Self {
        Self::build(descriptor, true)
    }

    /// 大小写敏感编译（cookie 值规则）
    pub fn compile_case_sensitive(descriptor: PatternDescriptor) -> Self {
        Self::build(descriptor, false)
    }

    fn build(descriptor: PatternDescriptor, case_insensitive: bool) -> Self {
        let kind = match descriptor.pattern_type {
            PatternType::Exact => Self::literal(&descriptor.pattern, case_insensitive),
            PatternType::Regex => match compile_regex(&descriptor.pattern, case_insensitive) {
                Ok(re) => MatcherKind::Regex(re),
                Err(e) => {
                    log::warn!(
                        "Regex compilation failed, falling back to exact: location={} pattern={} error={}",
                        descriptor.location,
                        descriptor.pattern,
                        e
                    );
                    Self::literal(&descriptor.pattern, case_insensitive)
                }
            },
            PatternType::Fuzzy => MatcherKind::Fuzzy(clean_fuzzy(&descriptor.pattern)),
            PatternType::Encoded => MatcherKind::Encoded(encoded_forms(&descriptor.pattern)),
        };

        Self {
            descriptor,
            kind,
            case_insensitive,
        }
    }

    fn literal(pattern: &str, case_insensitive: bool) -> MatcherKind {
        match compile_regex(&regex::escape(pattern), case_insensitive) {
            Ok(re) => MatcherKind::Literal(re),
            Err(_) if case_insensitive => MatcherKind::LoweredContains(pattern.to_lowercase()),
            Err(_) => MatcherKind::LoweredContains(pattern.to_string()),
        }
    }

    pub fn descriptor(&self) -> &PatternDescriptor {
        &self.descriptor
    }

    /// 正则是否已因编译失败回退为字面量
    pub fn is_degraded(&self) -> bool {
        self.descriptor.pattern_type == PatternType::Regex
            && !matches!(self.kind, MatcherKind::Regex(_))
    }

    /// 对单个值求值，永不失败
    pub fn evaluate(&self, value: &str) -> MatchOutcome {
        let (matched_values, version) = match &self.kind {
            MatcherKind::Literal(re) => match re.find(value) {
                Some(m) => (vec![m.as_str().to_string()], None),
                None => return MatchOutcome::miss(),
            },
            MatcherKind::LoweredContains(needle) => {
                let hit = if self.case_insensitive {
                    value.to_lowercase().contains(needle.as_str())
                } else {
                    value.contains(needle.as_str())
                };
                if !hit {
                    return MatchOutcome::miss();
                }
                (vec![self.descriptor.pattern.clone()], None)
            }
            MatcherKind::Regex(re) => {
                if !re.is_match(value) {
                    return MatchOutcome::miss();
                }
                let (values, version) = self.regex_hits(re, value);
                // 非空模式只命中零宽文本时不算命中；空模式仅表示存在
                if values.is_empty() && !self.descriptor.pattern.is_empty() {
                    return MatchOutcome::miss();
                }
                (values, version)
            }
            MatcherKind::Fuzzy(cleaned) => {
                if !fuzzy_match(&clean_fuzzy(value), cleaned) {
                    return MatchOutcome::miss();
                }
                (vec![self.descriptor.pattern.clone()], None)
            }
            MatcherKind::Encoded(forms) => match forms.iter().find(|f| value.contains(f.as_str())) {
                Some(form) => (vec![form.clone()], None),
                None => return MatchOutcome::miss(),
            },
        };

        MatchOutcome {
            matched: true,
            confidence: self.descriptor.weighted_confidence(),
            matched_values,
            version,
        }
    }

    /// 收集全部非空匹配（零宽匹配跳过），并尝试按版本模板提取版本
    fn regex_hits(&self, re: &Regex, value: &str) -> (Vec<String>, Option<String>) {
        let mut values = Vec::new();
        let mut version: Option<String> = None;

        for caps in re.captures_iter(value) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.as_str().is_empty() {
                continue;
            }
            if version.is_none() {
                version = VersionExtractor::extract(self.descriptor.version_template.as_deref(), &caps);
            }
            if values.len() < MAX_MATCHED_VALUES {
                values.push(whole.as_str().to_string());
            }
        }

        (values, version)
    }
}

/// 正则编译公共逻辑
/// 参数：
/// - pattern: 正则模式字符串
/// - case_insensitive: 是否忽略大小写
#[inline]
pub fn compile_regex(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(1 << 20)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, Priority};

    fn descriptor(pattern: &str, ty: PatternType) -> PatternDescriptor {
        PatternDescriptor::new(pattern, ty, 80.0, Priority::High, Channel::Headers)
    }

    #[test]
    fn test_exact_case_insensitive() {
        let p = CompiledPattern::compile(descriptor("CloudFlare", PatternType::Exact));
        let out = p.evaluate("server: cloudflare-nginx");
        assert!(out.matched);
        assert_eq!(out.confidence, 80.0);
        assert_eq!(out.matched_values, vec!["cloudflare"]);
    }

    #[test]
    fn test_exact_metacharacters_are_literal() {
        let p = CompiledPattern::compile(descriptor("a.b", PatternType::Exact));
        assert!(p.evaluate("xx a.b yy").matched);
        assert!(!p.evaluate("axb").matched);
    }

    #[test]
    fn test_regex_collects_all_matches_and_version() {
        let mut d = descriptor(r"nginx/([\d.]+)", PatternType::Regex);
        d.version_template = Some(r"\1".into());
        let p = CompiledPattern::compile(d);
        let out = p.evaluate("NGINX/1.2 behind nginx/1.25.3");
        assert!(out.matched);
        assert_eq!(out.matched_values, vec!["NGINX/1.2", "nginx/1.25.3"]);
        assert_eq!(out.version.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_regex_empty_pattern_matches_presence() {
        let p = CompiledPattern::compile(descriptor("", PatternType::Regex));
        let out = p.evaluate("anything");
        assert!(out.matched);
        assert!(out.matched_values.is_empty());
    }

    #[test]
    fn test_regex_zero_width_only_is_miss() {
        let p = CompiledPattern::compile(descriptor("q*", PatternType::Regex));
        assert_eq!(p.evaluate("abc"), MatchOutcome::miss());
        let out = p.evaluate("aqqb");
        assert!(out.matched);
        assert_eq!(out.matched_values, vec!["qq"]);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_exact() {
        let p = CompiledPattern::compile(descriptor("foo(bar", PatternType::Regex));
        assert!(p.is_degraded());
        assert!(p.evaluate("xx FOO(BAR yy").matched);
        assert!(!p.evaluate("foobar").matched);
    }

    #[test]
    fn test_case_sensitive_regex() {
        let p = CompiledPattern::compile_case_sensitive(descriptor("^abc", PatternType::Regex));
        assert!(p.evaluate("abcdef").matched);
        assert!(!p.evaluate("ABCDEF").matched);
    }

    #[test]
    fn test_encoded_base64_form() {
        let p = CompiledPattern::compile(descriptor("wp-admin", PatternType::Encoded));
        let out = p.evaluate("var t = 'd3AtYWRtaW4=';");
        assert!(out.matched);
        assert_eq!(out.matched_values, vec!["d3AtYWRtaW4="]);
        assert!(!p.evaluate("nothing here").matched);
    }

    #[test]
    fn test_miss_is_zero() {
        let p = CompiledPattern::compile(descriptor("absent", PatternType::Fuzzy));
        let out = p.evaluate("zzzzzzzzzzzzzzzzzzzzzzz");
        assert_eq!(out, MatchOutcome::miss());
    }
}
