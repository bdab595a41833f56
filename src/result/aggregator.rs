//! 结果聚合：技术列表 + 拦截评估 + 页面概况 → 单条输出
use rswebprobe_engine::ConfidenceLevel;

use super::technology::round_confidence;
use super::{
    AnalysisResult, BlockingAssessment, ConfidenceBreakdown, DetectedTechnology, PageAnalysis, PageStats,
    RawData,
};
use crate::config::DetectionConfig;
use crate::evidence::PageEvidence;
use crate::utils::HeaderConverter;

pub struct ResultAggregator;

impl ResultAggregator {
    /// 组装最终结果；blocking 仅在配置启用时输出
    pub fn aggregate(
        evidence: &PageEvidence,
        config: &DetectionConfig,
        technologies: Vec<DetectedTechnology>,
        page_analysis: PageAnalysis,
        blocking: Option<BlockingAssessment>,
    ) -> AnalysisResult {
        let stats = Self::stats(&technologies);
        let blocking_indicators = if config.blocking_detection_enabled {
            Some(blocking.unwrap_or_default())
        } else {
            None
        };
        let raw_data = config.include_raw_data.then(|| Self::raw_data(evidence));

        AnalysisResult {
            url: evidence.url.clone(),
            fetch_time: evidence.latency_ms,
            final_url: evidence.final_url.clone(),
            status_code: evidence.status_code,
            technologies,
            blocking_indicators,
            page_analysis,
            stats,
            raw_data,
            text_content_length: evidence.text_content_length,
            fetch_error: evidence.fetch_error.clone(),
        }
    }

    /// 抓取失败：全零结果，保留失败原因
    pub fn failed(evidence: &PageEvidence, config: &DetectionConfig) -> AnalysisResult {
        Self::aggregate(evidence, config, Vec::new(), PageAnalysis::default(), None)
    }

    /// 总数、各等级计数、平均置信度、首项
    pub fn stats(technologies: &[DetectedTechnology]) -> PageStats {
        let mut by_confidence = ConfidenceBreakdown::default();
        for tech in technologies {
            match tech.confidence_level {
                ConfidenceLevel::High => by_confidence.high += 1,
                ConfidenceLevel::Medium => by_confidence.medium += 1,
                ConfidenceLevel::Low => by_confidence.low += 1,
                ConfidenceLevel::None => {}
            }
        }

        let average_confidence = if technologies.is_empty() {
            0.0
        } else {
            let sum: f64 = technologies.iter().map(|t| t.confidence).sum();
            round_confidence(sum / technologies.len() as f64)
        };

        PageStats {
            total: technologies.len(),
            by_confidence,
            average_confidence,
            top_detection: technologies.first().cloned(),
        }
    }

    pub fn raw_data(evidence: &PageEvidence) -> RawData {
        RawData {
            headers: HeaderConverter::to_joined_map(&evidence.headers),
            cookies: evidence.cookies.clone(),
            meta_tags: evidence.meta.clone(),
        }
    }
}
