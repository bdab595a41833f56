//! 签名编译器核心
//! 将原始签名归一化并编译为可执行的匹配器

use indexmap::IndexMap;
use log::{debug, info};
use rswebprobe_engine::{
    core::split_tags, Channel, CompiledPattern, JsRule, PatternDescriptor, PatternType, Priority,
    RawPattern, Signature, SignatureLibrary, SignatureNormalizer,
};
use std::time::Instant;

use super::pattern::{
    CompileStats, CompiledLibrary, CompiledSignature, CookieRule, HeaderRule, JsPattern, MetaRule,
    COOKIE_MATCH_CONFIDENCE, HEADER_MATCH_CONFIDENCE,
};

/// 签名编译器
pub struct SignatureCompiler;

impl SignatureCompiler {
    /// 编译签名库，单条模式失败只降级不中断
    pub fn compile(library: &SignatureLibrary) -> CompiledLibrary {
        let start = Instant::now();
        let mut stats = CompileStats::default();
        let mut signatures = IndexMap::with_capacity(library.len());

        for (name, signature) in library.iter() {
            let compiled = Self::compile_signature(name, signature, &mut stats);
            signatures.insert(name.clone(), compiled);
        }

        info!(
            "Signature library compiled | techs: {} | elapsed: {:?}",
            signatures.len(),
            start.elapsed()
        );
        debug!(
            "Compile stats | js: {} | scriptSrc: {} | headers: {} | cookies: {} | html: {} | dom: {} | meta: {} | degraded: {}",
            stats.js, stats.script_src, stats.headers, stats.cookies, stats.html, stats.dom, stats.meta, stats.degraded
        );

        CompiledLibrary { signatures, stats }
    }

    /// 编译单个技术签名
    pub fn compile_signature(name: &str, signature: &Signature, stats: &mut CompileStats) -> CompiledSignature {
        let js = signature
            .js
            .as_ref()
            .map(|rule| Self::compile_js(rule, stats))
            .unwrap_or_default();
        let script_src = Self::compile_list(signature.script_src.as_ref(), Channel::ScriptSrc, stats);
        let html = Self::compile_list(signature.html.as_ref(), Channel::Html, stats);
        let headers = Self::compile_headers(signature.headers.as_ref(), stats);
        let cookies = Self::compile_cookies(signature.cookies.as_ref(), stats);
        let meta = Self::compile_meta(signature.meta.as_ref(), stats);

        let dom: Vec<String> = signature
            .dom
            .as_ref()
            .map(|rule| {
                rule.selectors()
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        stats.dom += dom.len();

        CompiledSignature {
            name: name.to_string(),
            js,
            script_src,
            headers,
            cookies,
            html,
            dom,
            meta,
            implies: signature.implies_list(),
            requires: signature.requires_list(),
        }
    }

    fn compile_pattern(descriptor: PatternDescriptor, stats: &mut CompileStats) -> CompiledPattern {
        let compiled = CompiledPattern::compile(descriptor);
        if compiled.is_degraded() {
            stats.degraded += 1;
        }
        compiled
    }

    /// 列表型通道（scriptSrc/html/js 列表），空模式丢弃
    fn compile_list(raw: Option<&RawPattern>, channel: Channel, stats: &mut CompileStats) -> Vec<CompiledPattern> {
        let Some(raw) = raw else {
            return Vec::new();
        };

        let patterns: Vec<CompiledPattern> = SignatureNormalizer::normalize(raw, channel)
            .into_iter()
            .filter(|d| !d.pattern.is_empty())
            .map(|d| Self::compile_pattern(d, stats))
            .collect();

        match channel {
            Channel::ScriptSrc => stats.script_src += patterns.len(),
            Channel::Html => stats.html += patterns.len(),
            Channel::Js => stats.js += patterns.len(),
            _ => {}
        }
        patterns
    }

    /// js：键控形式下键为脚本片段门槛，值为空时键本身即模式
    fn compile_js(rule: &JsRule, stats: &mut CompileStats) -> Vec<JsPattern> {
        match rule {
            JsRule::Plain(raw) => {
                let patterns = Self::compile_list(Some(raw), Channel::Js, stats);
                if patterns.is_empty() {
                    Vec::new()
                } else {
                    vec![JsPattern { gate: None, patterns }]
                }
            }
            JsRule::Keyed(map) => {
                let mut rules = Vec::with_capacity(map.len());
                for (key, raw) in map {
                    let key = key.trim();
                    if key.is_empty() {
                        continue;
                    }
                    if raw.is_empty() {
                        let descriptor = SignatureNormalizer::literal(key, Channel::Js);
                        rules.push(JsPattern {
                            gate: None,
                            patterns: vec![Self::compile_pattern(descriptor, stats)],
                        });
                        stats.js += 1;
                        continue;
                    }

                    let gate = CompiledPattern::compile(PatternDescriptor::new(
                        key,
                        PatternType::Exact,
                        Channel::Js.default_confidence(),
                        Channel::Js.default_priority(),
                        Channel::Js,
                    ));
                    let patterns = Self::compile_list(Some(raw), Channel::Js, stats);
                    if !patterns.is_empty() {
                        rules.push(JsPattern { gate: Some(gate), patterns });
                    }
                }
                rules
            }
        }
    }

    /// header 名规范化：trim、去尾部冒号、小写
    pub fn normalize_header_name(name: &str) -> String {
        name.trim().trim_end_matches(':').trim().to_ascii_lowercase()
    }

    /// header 值统一按 regex / 75 / HIGH 编译，空模式表示存在即命中
    fn compile_headers(map: Option<&IndexMap<String, String>>, stats: &mut CompileStats) -> Vec<HeaderRule> {
        let Some(map) = map else {
            return Vec::new();
        };

        let mut rules = Vec::with_capacity(map.len());
        for (name, raw) in map {
            let name = Self::normalize_header_name(name);
            if name.is_empty() {
                continue;
            }
            let (pattern, version_template) = split_tags(raw);
            let mut descriptor = PatternDescriptor::new(
                pattern,
                PatternType::Regex,
                HEADER_MATCH_CONFIDENCE,
                Priority::High,
                Channel::Headers,
            );
            descriptor.version_template = version_template;
            rules.push(HeaderRule {
                name,
                pattern: Self::compile_pattern(descriptor, stats),
            });
        }
        stats.headers += rules.len();
        rules
    }

    /// cookie 值按大小写敏感正则编译，空值只看名称
    fn compile_cookies(map: Option<&IndexMap<String, String>>, stats: &mut CompileStats) -> Vec<CookieRule> {
        let Some(map) = map else {
            return Vec::new();
        };

        let mut rules = Vec::with_capacity(map.len());
        for (name, raw) in map {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let (pattern, version_template) = split_tags(raw);
            let value = if pattern.is_empty() {
                None
            } else {
                let mut descriptor = PatternDescriptor::new(
                    pattern,
                    PatternType::Regex,
                    COOKIE_MATCH_CONFIDENCE,
                    Priority::High,
                    Channel::Cookies,
                );
                descriptor.version_template = version_template;
                let compiled = CompiledPattern::compile_case_sensitive(descriptor);
                if compiled.is_degraded() {
                    stats.degraded += 1;
                }
                Some(compiled)
            };
            rules.push(CookieRule {
                name: name.to_string(),
                value,
            });
        }
        stats.cookies += rules.len();
        rules
    }

    fn compile_meta(map: Option<&IndexMap<String, RawPattern>>, stats: &mut CompileStats) -> Vec<MetaRule> {
        let Some(map) = map else {
            return Vec::new();
        };

        let mut rules = Vec::with_capacity(map.len());
        for (name, raw) in map {
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                continue;
            }
            let patterns: Vec<CompiledPattern> = SignatureNormalizer::normalize(raw, Channel::Meta)
                .into_iter()
                .map(|d| Self::compile_pattern(d, stats))
                .collect();
            stats.meta += patterns.len();
            rules.push(MetaRule { name, patterns });
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rswebprobe_engine::SignatureParser;

    fn compile_one(json: &str) -> CompiledSignature {
        let sig: Signature = serde_json::from_str(json).unwrap();
        SignatureCompiler::compile_signature("Tech", &sig, &mut CompileStats::default())
    }

    #[test]
    fn test_compile_channels() {
        let sig = compile_one(
            r##"{
                "js": {"jQuery.fn.jquery": "", "Shopify": "theme"},
                "scriptSrc": ["jquery[.-]([\\d.]+)\\.js\\;version:\\1", ""],
                "headers": {" Server: ": "nginx"},
                "cookies": {"_cfuvid": "", "sess": "^[a-f0-9]+$"},
                "html": "<div id=\"wpadminbar\"",
                "dom": {"#app": {"exists": ""}},
                "meta": {"Generator": "WordPress"},
                "implies": ["PHP", "MySQL\\;confidence:50"]
            }"##,
        );

        assert_eq!(sig.js.len(), 2);
        assert!(sig.js[0].gate.is_none());
        assert!(sig.js[1].gate.is_some());
        assert_eq!(sig.script_src.len(), 1);
        assert_eq!(sig.headers[0].name, "server");
        assert_eq!(sig.headers[0].pattern.descriptor().pattern_type, PatternType::Regex);
        assert_eq!(sig.headers[0].pattern.descriptor().confidence, 75.0);
        assert!(sig.cookies[0].value.is_none());
        assert!(sig.cookies[1].value.is_some());
        assert_eq!(sig.dom, vec!["#app"]);
        assert_eq!(sig.meta[0].name, "generator");
        assert_eq!(sig.implies, vec!["PHP", "MySQL"]);
        assert!(!sig.has_no_evidence());
    }

    #[test]
    fn test_invalid_regex_counted_as_degraded() {
        let parsed = SignatureParser::new()
            .parse_str(r#"{"Broken": {"html": "<div class=\"(unclosed"}, "Ok": {"html": "plain"}}"#)
            .unwrap();
        let lib = SignatureCompiler::compile(&parsed.library);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.stats.degraded, 1);
        assert_eq!(lib.stats.html, 2);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let parsed = SignatureParser::new()
            .parse_str(r#"{"Zeta": {}, "Alpha": {"implies": "Zeta"}}"#)
            .unwrap();
        let lib = SignatureCompiler::compile(&parsed.library);
        let names: Vec<&str> = lib.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert!(lib.get("Zeta").unwrap().has_no_evidence());
    }
}
