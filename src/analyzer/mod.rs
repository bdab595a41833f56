use rswebprobe_engine::{Channel, PatternDescriptor, PatternMatches, MAX_CONFIDENCE};

use crate::compiler::CompiledSignature;
use crate::evidence::PageEvidence;

pub mod common;
pub mod cookie;
pub mod dom;
pub mod header;
pub mod html;
pub mod meta;
pub mod script;
pub mod script_src;

pub use self::cookie::CookieChecker;
pub use self::dom::DomChecker;
pub use self::header::HeaderChecker;
pub use self::html::HtmlChecker;
pub use self::meta::MetaChecker;
pub use self::script::JsChecker;
pub use self::script_src::ScriptSrcChecker;

/// 单通道检查结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelOutcome {
    /// 0-100
    pub confidence: f64,
    pub matches: Vec<PatternDescriptor>,
}

impl ChannelOutcome {
    #[inline(always)]
    pub fn matched(&self) -> bool {
        !self.matches.is_empty()
    }

    /// 记录单条命中
    pub fn record(&mut self, confidence: f64, hit: PatternDescriptor) {
        self.confidence += confidence;
        self.matches.push(hit);
    }

    /// 合并一次多模式匹配的结果
    pub fn absorb(&mut self, matches: PatternMatches) {
        self.confidence += matches.confidence;
        self.matches.extend(matches.matches);
    }

    fn capped(mut self) -> Self {
        self.confidence = self.confidence.min(MAX_CONFIDENCE);
        self
    }
}

/// 所有通道检查器的通用抽象特质
/// R-规则集类型（支持动态大小类型）
pub trait ChannelChecker<R: ?Sized> {
    /// 检查器对应的证据通道，用于日志与结果标注
    const CHANNEL: Channel;

    /// 从编译后的签名中取当前通道的规则集，无规则返回 None
    fn get_rules(signature: &CompiledSignature) -> Option<&R>;

    /// 核心业务匹配逻辑，各检查器唯一的差异化实现点
    fn match_logic(tech_name: &str, rules: &R, evidence: &PageEvidence) -> ChannelOutcome;

    /// 通用执行骨架：规则判空 → 业务匹配 → 通道封顶 100
    #[inline(always)]
    fn check(signature: &CompiledSignature, evidence: &PageEvidence) -> ChannelOutcome {
        let Some(rules) = Self::get_rules(signature) else {
            return ChannelOutcome::default();
        };
        Self::match_logic(&signature.name, rules, evidence).capped()
    }
}

/// 非空切片才视为声明了规则
#[inline(always)]
pub(crate) fn non_empty<T>(rules: &[T]) -> Option<&[T]> {
    (!rules.is_empty()).then_some(rules)
}

/// 按固定通道顺序运行全部检查器
pub fn check_all(signature: &CompiledSignature, evidence: &PageEvidence) -> Vec<(Channel, ChannelOutcome)> {
    Channel::ALL
        .iter()
        .map(|&channel| {
            let outcome = match channel {
                Channel::Js => <JsChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::ScriptSrc => <ScriptSrcChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::Headers => <HeaderChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::Cookies => <CookieChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::Html => <HtmlChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::Dom => <DomChecker as ChannelChecker<_>>::check(signature, evidence),
                Channel::Meta => <MetaChecker as ChannelChecker<_>>::check(signature, evidence),
            };
            (channel, outcome)
        })
        .collect()
}
