//! 模式匹配器
//! 单值 × 单模式 → 置信度贡献；单值 × 多模式 → 累加后封顶 100
pub mod compiled;
pub mod encoded;
pub mod fuzzy;

pub use compiled::{compile_regex, CompiledPattern, MatchOutcome, MAX_MATCHED_VALUES};

use crate::core::PatternDescriptor;

/// 置信度上限
pub const MAX_CONFIDENCE: f64 = 100.0;

/// 多模式聚合结果
#[derive(Debug, Clone, Default)]
pub struct PatternMatches {
    pub confidence: f64,
    pub matches: Vec<PatternDescriptor>,
}

impl PatternMatches {
    #[inline(always)]
    pub fn matched(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub struct PatternMatcher;

impl PatternMatcher {
    /// 单模式求值，命中时返回带匹配值的描述体
    pub fn match_one(value: &str, pattern: &CompiledPattern) -> Option<(f64, PatternDescriptor)> {
        let outcome = pattern.evaluate(value);
        if !outcome.matched {
            return None;
        }
        let hit = pattern
            .descriptor()
            .to_match(outcome.matched_values, outcome.version);
        Some((outcome.confidence, hit))
    }

    /// 每条模式独立求值，置信度累加后封顶 100（不取平均）
    pub fn match_all(value: &str, patterns: &[CompiledPattern]) -> PatternMatches {
        let mut result = PatternMatches::default();
        for pattern in patterns {
            if let Some((confidence, hit)) = Self::match_one(value, pattern) {
                result.confidence += confidence;
                result.matches.push(hit);
            }
        }
        result.confidence = result.confidence.min(MAX_CONFIDENCE);
        result
    }

    /// 直接对未编译的描述体求值（一次性场景）
    pub fn match_descriptor(value: &str, descriptor: &PatternDescriptor) -> MatchOutcome {
        CompiledPattern::compile(descriptor.clone()).evaluate(value)
    }
}
