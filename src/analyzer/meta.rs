use rswebprobe_engine::{Channel, PatternMatcher};

use crate::analyzer::{common::handle_match_success, non_empty, ChannelChecker, ChannelOutcome};
use crate::compiler::{CompiledSignature, MetaRule};
use crate::evidence::PageEvidence;

// Meta 分析器
pub struct MetaChecker;

impl ChannelChecker<[MetaRule]> for MetaChecker {
    const CHANNEL: Channel = Channel::Meta;

    fn get_rules(signature: &CompiledSignature) -> Option<&[MetaRule]> {
        non_empty(&signature.meta)
    }

    fn match_logic(tech_name: &str, rules: &[MetaRule], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();

        for rule in rules {
            let Some(content) = evidence.meta.get(&rule.name) else {
                continue;
            };
            for pattern in &rule.patterns {
                if let Some((confidence, hit)) = PatternMatcher::match_one(content, pattern) {
                    handle_match_success(Self::CHANNEL, tech_name, &rule.name, content, confidence, hit, &mut outcome);
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

    fn evidence(meta: &[(&str, &str)]) -> PageEvidence {
        PageEvidence {
            meta: meta.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..PageEvidence::default()
        }
    }

    #[test]
    fn test_generator_with_version() {
        let sig = signature(r#"{"meta": {"Generator": "^WordPress ?([\\d.]+)?\\;version:\\1"}}"#);
        let out = MetaChecker::check(&sig, &evidence(&[("generator", "WordPress 6.4.2")]));
        assert_eq!(out.matches[0].version.as_deref(), Some("6.4.2"));
        // meta 默认 50 × LOW 0.4
        assert!((out.confidence - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_meta_name_ignored() {
        let sig = signature(r#"{"meta": {"generator": "Hugo"}}"#);
        assert!(!MetaChecker::check(&sig, &evidence(&[("description", "Hugo site")])).matched());
    }
}
