use rswebprobe_engine::{Channel, PatternDescriptor, PatternType, Priority};

use crate::analyzer::{
    common::{handle_exists_success, handle_match_success},
    non_empty, ChannelChecker, ChannelOutcome,
};
use crate::compiler::{CompiledSignature, CookieRule, COOKIE_MATCH_CONFIDENCE};
use crate::evidence::PageEvidence;

// Cookie 分析器
pub struct CookieChecker;

impl ChannelChecker<[CookieRule]> for CookieChecker {
    const CHANNEL: Channel = Channel::Cookies;

    fn get_rules(signature: &CompiledSignature) -> Option<&[CookieRule]> {
        non_empty(&signature.cookies)
    }

    /// 实时 cookie 名包含声明名即候选；声明值非空时还需值正则命中
    fn match_logic(tech_name: &str, rules: &[CookieRule], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();

        for (live_name, live_value) in &evidence.cookies {
            for rule in rules {
                if !live_name.contains(rule.name.as_str()) {
                    continue;
                }
                match &rule.value {
                    None => {
                        let hit = PatternDescriptor::new(
                            rule.name.as_str(),
                            PatternType::Exact,
                            COOKIE_MATCH_CONFIDENCE,
                            Priority::High,
                            Self::CHANNEL,
                        )
                        .to_match(vec![live_name.clone()], None);
                        handle_exists_success(
                            Self::CHANNEL,
                            tech_name,
                            live_name,
                            hit.weighted_confidence(),
                            hit,
                            &mut outcome,
                        );
                    }
                    Some(pattern) => {
                        let result = pattern.evaluate(live_value);
                        if !result.matched {
                            continue;
                        }
                        let mut values = vec![live_name.clone()];
                        values.extend(result.matched_values);
                        let hit = pattern.descriptor().to_match(values, result.version);
                        handle_match_success(
                            Self::CHANNEL,
                            tech_name,
                            live_name,
                            live_value,
                            result.confidence,
                            hit,
                            &mut outcome,
                        );
                    }
                }
            }
        }
        outcome
    }
}
