use rswebprobe_engine::{Channel, PatternDescriptor, PatternType, Priority};

use crate::analyzer::{common::handle_exists_success, ChannelChecker, ChannelOutcome};
use crate::compiler::{CompiledSignature, DOM_MATCH_CONFIDENCE};
use crate::evidence::PageEvidence;

// DOM 选择器分析器
pub struct DomChecker;

impl ChannelChecker<[String]> for DomChecker {
    const CHANNEL: Channel = Channel::Dom;

    fn get_rules(signature: &CompiledSignature) -> Option<&[String]> {
        (!signature.dom.is_empty()).then_some(signature.dom.as_slice())
    }

    /// 选择器命中非空即计分；无 DOM 或非法选择器视为未命中
    fn match_logic(tech_name: &str, selectors: &[String], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();
        let Some(dom) = evidence.dom.as_ref() else {
            return outcome;
        };

        for selector in selectors {
            let found = match dom.query_all(selector) {
                Ok(found) => found,
                Err(e) => {
                    log::debug!("[{}]选择器无效，按未命中处理 | 技术: {} | {}", Self::CHANNEL, tech_name, e);
                    continue;
                }
            };
            if found.is_empty() {
                continue;
            }

            let hit = PatternDescriptor::new(
                selector.as_str(),
                PatternType::Exact,
                DOM_MATCH_CONFIDENCE,
                Priority::High,
                Self::CHANNEL,
            )
            .to_match(found.iter().map(|el| el.tag.clone()).collect(), None);
            handle_exists_success(Self::CHANNEL, tech_name, selector, hit.weighted_confidence(), hit, &mut outcome);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{DomQuery, HtmlDocument};
    use std::sync::Arc;

    use crate::analyzer::test_support::signature;

    fn evidence(html: &str) -> PageEvidence {
        let dom: Arc<dyn DomQuery> = Arc::new(HtmlDocument::new(html));
        PageEvidence {
            dom: Some(dom),
            ..PageEvidence::default()
        }
    }

    #[test]
    fn test_selector_hit_scores_45() {
        let sig = signature(r##"{"dom": {"#__next": {"exists": ""}, ".missing": {"exists": ""}}}"##);
        let out = DomChecker::check(&sig, &evidence(r#"<div id="__next"></div>"#));
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.confidence, 45.0);
        assert_eq!(out.matches[0].matched_values, vec!["div"]);
    }

    #[test]
    fn test_invalid_selector_is_no_match() {
        let sig = signature(r#"{"dom": ["div[[[", "body"]}"#);
        let out = DomChecker::check(&sig, &evidence("<html><body></body></html>"));
        assert_eq!(out.matches.len(), 1);
    }

    #[test]
    fn test_missing_dom_is_zero() {
        let sig = signature(r##"{"dom": "#app"}"##);
        assert!(!DomChecker::check(&sig, &PageEvidence::default()).matched());
    }
}
