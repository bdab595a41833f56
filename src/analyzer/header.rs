use rswebprobe_engine::{Channel, PatternMatcher};

use crate::analyzer::{common::handle_match_success, non_empty, ChannelChecker, ChannelOutcome};
use crate::compiler::{CompiledSignature, HeaderRule};
use crate::evidence::PageEvidence;

// Header 分析器
pub struct HeaderChecker;

impl ChannelChecker<[HeaderRule]> for HeaderChecker {
    const CHANNEL: Channel = Channel::Headers;

    fn get_rules(signature: &CompiledSignature) -> Option<&[HeaderRule]> {
        non_empty(&signature.headers)
    }

    fn match_logic(tech_name: &str, rules: &[HeaderRule], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();

        for rule in rules {
            // 未发送的 header 不扣分，直接跳过
            let Some(value) = evidence.header(&rule.name) else {
                continue;
            };
            if let Some((confidence, hit)) = PatternMatcher::match_one(&value, &rule.pattern) {
                handle_match_success(Self::CHANNEL, tech_name, &rule.name, &value, confidence, hit, &mut outcome);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::HeaderConverter;

    use crate::analyzer::test_support::signature;

    fn evidence(pairs: &[(&str, &str)]) -> PageEvidence {
        PageEvidence {
            headers: HeaderConverter::from_pairs(pairs.iter().copied()).unwrap(),
            ..PageEvidence::default()
        }
    }

    #[test]
    fn test_server_header_scores_75() {
        let sig = signature(r#"{"headers": {"Server": "cloudflare"}}"#);
        let out = HeaderChecker::check(&sig, &evidence(&[("server", "cloudflare")]));
        assert_eq!(out.confidence, 75.0);
        assert_eq!(out.matches[0].matched_values, vec!["cloudflare"]);
    }

    #[test]
    fn test_trailing_colon_and_version() {
        let sig = signature(r#"{"headers": {"X-Powered-By:": "PHP/?([\\d.]+)?\\;version:\\1"}}"#);
        let out = HeaderChecker::check(&sig, &evidence(&[("X-Powered-By", "PHP/8.2.1")]));
        assert!(out.matched());
        assert_eq!(out.matches[0].version.as_deref(), Some("8.2.1"));
    }

    #[test]
    fn test_multi_value_joined() {
        let sig = signature(r#"{"headers": {"Via": "varnish"}}"#);
        let out = HeaderChecker::check(&sig, &evidence(&[("Via", "1.1 proxy"), ("Via", "1.1 varnish")]));
        assert!(out.matched());
    }

    #[test]
    fn test_empty_pattern_is_presence_and_absence_is_zero() {
        let sig = signature(r#"{"headers": {"CF-RAY": "", "X-Missing": "anything"}}"#);
        let out = HeaderChecker::check(&sig, &evidence(&[("cf-ray", "8a1b2c3d-AMS")]));
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.confidence, 75.0);
    }

    #[test]
    fn test_value_mismatch() {
        let sig = signature(r#"{"headers": {"Server": "^nginx"}}"#);
        assert!(!HeaderChecker::check(&sig, &evidence(&[("Server", "Apache")])).matched());
    }
}
