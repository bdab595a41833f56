use rswebprobe_engine::{Channel, CompiledPattern, PatternMatcher};

use crate::analyzer::{common::handle_match_success, non_empty, ChannelChecker, ChannelOutcome};
use crate::compiler::CompiledSignature;
use crate::evidence::PageEvidence;

// HTML 源码分析器
pub struct HtmlChecker;

impl ChannelChecker<[CompiledPattern]> for HtmlChecker {
    const CHANNEL: Channel = Channel::Html;

    fn get_rules(signature: &CompiledSignature) -> Option<&[CompiledPattern]> {
        non_empty(&signature.html)
    }

    fn match_logic(tech_name: &str, patterns: &[CompiledPattern], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();
        if evidence.html.is_empty() {
            return outcome;
        }

        for pattern in patterns {
            if let Some((confidence, hit)) = PatternMatcher::match_one(&evidence.html, pattern) {
                let snippet = hit.matched_values.first().cloned().unwrap_or_default();
                handle_match_success(Self::CHANNEL, tech_name, "html", &snippet, confidence, hit, &mut outcome);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::signature;

    fn evidence(html: &str) -> PageEvidence {
        PageEvidence {
            html: html.to_string(),
            ..PageEvidence::default()
        }
    }

    #[test]
    fn test_literal_html_low_weight() {
        let sig = signature(r#"{"html": "wp-content/themes"}"#);
        let out = HtmlChecker::check(&sig, &evidence(r#"<link href="/wp-content/themes/x.css">"#));
        // html 默认 40 × MEDIUM 0.7
        assert!((out.confidence - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_exact() {
        let sig = signature(r#"{"html": "<div class=\"(unclosed"}"#);
        assert!(HtmlChecker::check(&sig, &evidence(r#"<div class="(unclosed">"#)).matched());
        assert!(!HtmlChecker::check(&sig, &evidence(r#"<div class="closed">"#)).matched());
    }

    #[test]
    fn test_explicit_pattern_passes_through() {
        let sig = signature(
            r#"{"html": [{"pattern": "data-reactroot", "type": "exact", "confidence": 90, "priority": "HIGH"}]}"#,
        );
        let out = HtmlChecker::check(&sig, &evidence(r#"<div data-reactroot="">"#));
        assert_eq!(out.confidence, 90.0);
    }

    #[test]
    fn test_empty_html() {
        let sig = signature(r#"{"html": "anything"}"#);
        assert!(!HtmlChecker::check(&sig, &evidence("")).matched());
    }
}
