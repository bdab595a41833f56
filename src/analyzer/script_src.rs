use rswebprobe_engine::{Channel, CompiledPattern, PatternMatcher};

use crate::analyzer::{common::handle_match_success, non_empty, ChannelChecker, ChannelOutcome};
use crate::compiler::CompiledSignature;
use crate::evidence::PageEvidence;

// 外部脚本/资源 URL 分析器
pub struct ScriptSrcChecker;

impl ChannelChecker<[CompiledPattern]> for ScriptSrcChecker {
    const CHANNEL: Channel = Channel::ScriptSrc;

    fn get_rules(signature: &CompiledSignature) -> Option<&[CompiledPattern]> {
        non_empty(&signature.script_src)
    }

    fn match_logic(tech_name: &str, patterns: &[CompiledPattern], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();

        for url in &evidence.asset_urls {
            for pattern in patterns {
                if let Some((confidence, hit)) = PatternMatcher::match_one(url, pattern) {
                    handle_match_success(Self::CHANNEL, tech_name, "src", url, confidence, hit, &mut outcome);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::signature;

    fn evidence(urls: &[&str]) -> PageEvidence {
        PageEvidence {
            asset_urls: urls.iter().map(|s| s.to_string()).collect(),
            ..PageEvidence::default()
        }
    }

    #[test]
    fn test_regex_with_version() {
        let sig = signature(r#"{"scriptSrc": "jquery[.-]([\\d.]+)(?:\\.min)?\\.js\\;version:\\1"}"#);
        let out = ScriptSrcChecker::check(&sig, &evidence(&["/static/app.css", "https://cdn.example/jquery-3.6.0.min.js"]));
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].version.as_deref(), Some("3.6.0"));
        // scriptSrc 默认 70 × MEDIUM 0.7
        assert!((out.confidence - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_each_url_counts() {
        let sig = signature(r#"{"scriptSrc": ["wp-content", "wp-includes"]}"#);
        let out = ScriptSrcChecker::check(
            &sig,
            &evidence(&["/wp-content/themes/a.css", "/wp-includes/js/wp-emoji.js", "/wp-content/b.js"]),
        );
        assert_eq!(out.matches.len(), 3);
        assert_eq!(out.confidence, 100.0);
    }

    #[test]
    fn test_no_assets() {
        let sig = signature(r#"{"scriptSrc": "react"}"#);
        assert!(!ScriptSrcChecker::check(&sig, &evidence(&[])).matched());
    }
}
