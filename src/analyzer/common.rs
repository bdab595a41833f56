use log::debug;
use rswebprobe_engine::{preview_compact, Channel, PatternDescriptor};

use super::ChannelOutcome;

/// 日志中匹配内容的预览长度
const LOG_PREVIEW_LEN: usize = 80;

/// 匹配成功通用处理器 - 标准日志输出 + 通道结果累加
#[inline(always)]
pub fn handle_match_success(
    channel: Channel,
    tech_name: &str,
    target_key: &str,
    target_val: &str,
    confidence: f64,
    hit: PatternDescriptor,
    outcome: &mut ChannelOutcome,
) {
    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "[{}]匹配成功 | 技术: {} | 匹配项: {} | 内容: {} | 版本: {:?} | 规则: {} ({}, +{:.1})",
            channel,
            tech_name,
            target_key,
            preview_compact(target_val, LOG_PREVIEW_LEN),
            hit.version,
            preview_compact(&hit.pattern, LOG_PREVIEW_LEN),
            hit.pattern_type,
            confidence
        );
    }
    outcome.record(confidence, hit);
}

/// 存在性匹配成功简化处理器
#[inline(always)]
pub fn handle_exists_success(
    channel: Channel,
    tech_name: &str,
    target_key: &str,
    confidence: f64,
    hit: PatternDescriptor,
    outcome: &mut ChannelOutcome,
) {
    debug!(
        "[{}]存在性匹配成功 | 技术: {} | 匹配项: {} | +{:.1}",
        channel, tech_name, target_key, confidence
    );
    outcome.record(confidence, hit);
}
