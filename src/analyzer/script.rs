use rswebprobe_engine::{Channel, PatternMatcher};

use crate::analyzer::{common::handle_match_success, non_empty, ChannelChecker, ChannelOutcome};
use crate::compiler::{CompiledSignature, JsPattern};
use crate::evidence::PageEvidence;

// 内联脚本分析器
pub struct JsChecker;

impl ChannelChecker<[JsPattern]> for JsChecker {
    const CHANNEL: Channel = Channel::Js;

    fn get_rules(signature: &CompiledSignature) -> Option<&[JsPattern]> {
        non_empty(&signature.js)
    }

    fn match_logic(tech_name: &str, rules: &[JsPattern], evidence: &PageEvidence) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::default();

        for (index, script) in evidence.inline_scripts.iter().enumerate() {
            for rule in rules {
                // 键控规则：脚本须先包含对应代码片段
                if let Some(gate) = &rule.gate {
                    if !gate.evaluate(script).matched {
                        continue;
                    }
                }
                for pattern in &rule.patterns {
                    if let Some((confidence, hit)) = PatternMatcher::match_one(script, pattern) {
                        handle_match_success(
                            Self::CHANNEL,
                            tech_name,
                            &format!("script#{}", index),
                            script,
                            confidence,
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
